//! Port abstraction for user account persistence and its errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, UserAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already registered: {username}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::Connection { message } => {
                tracing::warn!(%message, "user repository unavailable");
                Error::service_unavailable("storage is temporarily unavailable")
            }
            UserPersistenceError::Query { message } => {
                tracing::error!(%message, "user repository query failed");
                Error::internal("storage query failed")
            }
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict(format!("username '{username}' is already taken"))
                    .with_reason("duplicate_username")
            }
        }
    }
}

/// Account data written on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return its generated id.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username's uniqueness constraint rejects the row.
    async fn insert(&self, account: &NewUserAccount) -> Result<UserId, UserPersistenceError>;

    /// Fetch an account by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError>;
}

/// Fixture repository that stores nothing.
///
/// Inserts report user id 1; lookups always miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _account: &NewUserAccount) -> Result<UserId, UserPersistenceError> {
        UserId::new(1).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn duplicate_username_maps_to_conflict() {
        let error = Error::from(UserPersistenceError::duplicate_username("alice"));
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.reason(), Some("duplicate_username"));
    }

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    fn storage_failures_map_to_infrastructure_codes(
        #[case] err: UserPersistenceError,
        #[case] code: ErrorCode,
    ) {
        assert_eq!(Error::from(err).code(), code);
    }
}
