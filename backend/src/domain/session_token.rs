//! Signed session tokens.
//!
//! Tokens are HS256 JWTs carrying `{ sub, iat, exp }`. They expire exactly
//! 24 hours after minting and are never persisted or revoked. Expiry is
//! checked against the injected [`Clock`], with no leeway.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Error, UserId};

/// Lifetime of a minted token, in seconds.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Shared HMAC secret used to sign and verify tokens.
///
/// The bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Secret length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret(<{} bytes>)", self.len())
    }
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated user, carried as a decimal string on the wire.
    #[serde(with = "subject")]
    pub sub: UserId,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// JWT registered claims require `sub` to be a string.
mod subject {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UserId;

    pub(super) fn serialize<S: Serializer>(id: &UserId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let id = raw.parse::<i32>().map_err(D::Error::custom)?;
        UserId::new(id).map_err(D::Error::custom)
    }
}

/// Opaque signed token string handed to clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Borrow the encoded token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Token verification and signing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not a well-formed JWT with the expected claims.
    #[error("session token is malformed")]
    Malformed,
    /// The token's expiry has passed.
    #[error("session token has expired")]
    Expired,
    /// The signature does not match the configured secret.
    #[error("session token signature is invalid")]
    BadSignature,
    /// Signing failed.
    #[error("failed to sign session token: {message}")]
    Signing { message: String },
}

impl TokenError {
    fn reason(&self) -> &'static str {
        match self {
            Self::Malformed => "token_malformed",
            Self::Expired => "token_expired",
            Self::BadSignature => "token_bad_signature",
            Self::Signing { .. } => "token_signing_failed",
        }
    }
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        let reason = value.reason();
        let error = match value {
            TokenError::Signing { .. } => Error::internal(value.to_string()),
            _ => Error::unauthorized(value.to_string()),
        };
        error.with_reason(reason)
    }
}

/// Mints and verifies session tokens with an injected secret and clock.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use cinephile::domain::{SigningSecret, TokenService, UserId};
/// use mockable::DefaultClock;
///
/// let tokens = TokenService::new(
///     &SigningSecret::new(vec![7; 32]),
///     Arc::new(DefaultClock),
/// );
/// let user = UserId::new(1).expect("valid id");
/// let token = tokens.mint(user).expect("mint");
/// assert_eq!(tokens.verify(token.as_str()).expect("verify").sub, user);
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Build a token service from a secret and clock.
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is compared against `clock`, not the system time.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Mint a token for `user_id` that expires in [`SESSION_TTL_SECS`].
    pub fn mint(&self, user_id: UserId) -> Result<SessionToken, TokenError> {
        let now = self.clock.utc().timestamp();
        let claims = SessionClaims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(SESSION_TTL_SECS),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(SessionToken)
            .map_err(|err| TokenError::Signing {
                message: err.to_string(),
            })
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            },
        )?;
        let claims = data.claims;
        if self.clock.utc().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
