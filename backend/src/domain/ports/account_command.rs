//! Driving ports for account registration, login and session lookup.
//!
//! Inbound adapters call these without knowing how passwords are hashed or
//! where accounts live, so handler tests can substitute mocks.

use async_trait::async_trait;

use crate::domain::{
    Error, LoginCredentials, RegistrationDetails, SessionClaims, SessionToken, UserId,
    UserProfile,
};

/// Account and freshly minted token returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub account: UserProfile,
    pub token: SessionToken,
}

/// Domain use-case port for creating accounts and signing in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// - `conflict` / `duplicate_username` when the name is taken.
    /// - `internal_error` when hashing or signing fails.
    async fn register(&self, details: &RegistrationDetails) -> Result<SessionGrant, Error>;

    /// Check credentials and mint a token.
    ///
    /// # Errors
    ///
    /// - `not_found` / `user_not_found` for an unknown username.
    /// - `unauthorized` / `password_mismatch` for a wrong password.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, Error>;
}

/// Domain use-case port for reading the signed-in account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Public profile of `user_id`.
    async fn current_account(&self, user_id: UserId) -> Result<UserProfile, Error>;
}

/// Verifies bearer tokens presented by clients.
#[cfg_attr(test, mockall::automock)]
pub trait SessionVerifier: Send + Sync {
    /// Validate `token` and return its claims.
    ///
    /// # Errors
    ///
    /// `unauthorized` with reason `token_malformed`, `token_expired` or
    /// `token_bad_signature`.
    fn verify(&self, token: &str) -> Result<SessionClaims, Error>;
}
