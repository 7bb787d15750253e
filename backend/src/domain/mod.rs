//! Domain primitives, ports and services.
//!
//! Purpose: Define strongly typed entities for the catalogue, accounts,
//! reviews and engagement sets, plus the services that orchestrate them
//! behind the port traits in [`ports`]. Nothing in this module talks to a
//! database or reads process configuration.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - AccountService, ReviewService, EngagementService — driving port
//!   implementations.
//! - IdentityResolver — username and title slug resolution.
//! - TokenService — session token minting and verification.

mod account_service;
pub mod auth;
mod engagement;
mod engagement_service;
pub mod error;
mod identity;
mod movie;
mod password;
pub mod ports;
mod review;
mod review_service;
mod session_token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, RegistrationDetails};
pub use self::engagement::{EngagementRelation, MembershipChange, UnknownRelation};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::IdentityResolver;
pub use self::movie::{Movie, MovieId, TitleSlug};
#[cfg(test)]
pub use self::password::MockPasswordHasher;
pub use self::password::{
    Argon2PasswordHasher, PasswordHashError, PasswordHasher, PasswordSettings,
};
pub use self::review::{
    Review, ReviewDraft, ReviewId, ReviewOutcome, ReviewReceipt, STARS_MAX, STARS_MIN,
    StarRating, StarRatingError, mean_rating,
};
pub use self::review_service::ReviewService;
pub use self::session_token::{
    SESSION_TTL_SECS, SessionClaims, SessionToken, SigningSecret, TokenError, TokenService,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, USERNAME_MAX, UserAccount, UserId, UserProfile, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cinephile::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
