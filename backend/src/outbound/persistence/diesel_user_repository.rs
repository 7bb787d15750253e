//! PostgreSQL-backed user account repository.
//!
//! Usernames are unique at the database level; the insert relies on that
//! constraint rather than a prior lookup, so concurrent registrations of the
//! same name cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserAccount, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, UserAccount, UserId, Username};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn insert_error(error: diesel::result::Error, username: &Username) -> UserPersistenceError {
    if is_unique_violation(&error, None) {
        UserPersistenceError::duplicate_username(username.as_str())
    } else {
        diesel_error(error)
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(UserAccount {
        id: UserId::new(row.id).map_err(invalid)?,
        username: Username::new(&row.username).map_err(invalid)?,
        email: EmailAddress::new(&row.email).map_err(invalid)?,
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &NewUserAccount) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            username: account.username.as_str(),
            email: account.email.as_str(),
            password_hash: &account.password_hash,
        };
        let id: i32 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| insert_error(err, &account.username))?;
        UserId::new(id).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_account)
            .transpose()
    }
}
