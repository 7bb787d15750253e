//! Adaptive password hashing.
//!
//! Hashes are Argon2id PHC strings; the salt and cost parameters travel
//! inside the encoded hash so verification never needs configuration.

use argon2::password_hash::{
    Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

/// Failures raised while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Cost parameters were rejected by the hashing backend.
    #[error("invalid password hashing parameters: {message}")]
    InvalidParams { message: String },
    /// Hashing itself failed.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    /// The stored hash could not be parsed.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
}

/// Hashes and verifies user passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce an encoded hash for `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Compare `plaintext` against an encoded hash in constant time.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the stored hash
    /// cannot be interpreted.
    fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool, PasswordHashError>;
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordSettings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    /// 19 MiB, two passes, single lane.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// [`PasswordHasher`] backed by Argon2id.
///
/// # Examples
/// ```
/// use cinephile::domain::{Argon2PasswordHasher, PasswordHasher, PasswordSettings};
///
/// let hasher = Argon2PasswordHasher::new(PasswordSettings {
///     memory_kib: 64,
///     iterations: 1,
///     parallelism: 1,
/// })
/// .expect("valid parameters");
/// let hash = hasher.hash("hunter2").expect("hash");
/// assert!(hasher.verify("hunter2", &hash).expect("verify"));
/// ```
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Validate the cost parameters and build a hasher.
    pub fn new(settings: PasswordSettings) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| PasswordHashError::InvalidParams {
            message: err.to_string(),
        })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })
    }

    fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(encoded).map_err(|err| PasswordHashError::MalformedHash {
            message: err.to_string(),
        })?;
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::MalformedHash {
                message: err.to_string(),
            }),
        }
    }
}
