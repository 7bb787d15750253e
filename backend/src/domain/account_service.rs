//! Account domain service: registration, login and session lookup.
//!
//! Passwords are hashed off the async executor; tokens are minted by the
//! injected [`TokenService`]. Nothing here reads process configuration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountQuery, NewUserAccount, SessionGrant, SessionVerifier, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordHashError, PasswordHasher, RegistrationDetails,
    SessionClaims, TokenService, UserId, UserProfile,
};

/// Account service implementing the account driving ports.
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: TokenService,
}

impl<U, H> Clone for AccountService<U, H> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: self.tokens.clone(),
        }
    }
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn hashing_failed(err: &PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("password hashing failed").with_reason("hashing_failed")
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, plaintext: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(plaintext.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| hashing_failed(&err))
    }

    async fn verify_password(&self, plaintext: &str, encoded: &str) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let encoded = encoded.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(plaintext.as_str(), &encoded))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(|err| hashing_failed(&err))
    }

    fn grant(&self, account: UserProfile) -> Result<SessionGrant, Error> {
        let token = self.tokens.mint(account.id)?;
        Ok(SessionGrant { account, token })
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, details: &RegistrationDetails) -> Result<SessionGrant, Error> {
        let password_hash = self.hash_password(details.password()).await?;
        let account = NewUserAccount {
            username: details.username().clone(),
            email: details.email().clone(),
            password_hash,
        };
        let id = self.users.insert(&account).await?;
        info!(user_id = %id, "account registered");

        self.grant(UserProfile {
            id,
            username: account.username,
            email: account.email,
        })
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, Error> {
        let Some(account) = self.users.find_by_username(credentials.username()).await? else {
            return Err(Error::not_found("user not found").with_reason("user_not_found"));
        };

        if !self
            .verify_password(credentials.password(), &account.password_hash)
            .await?
        {
            info!(user_id = %account.id, "login rejected: password mismatch");
            return Err(Error::unauthorized("invalid credentials").with_reason("password_mismatch"));
        }

        info!(user_id = %account.id, "login succeeded");
        self.grant(account.profile())
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn current_account(&self, user_id: UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|account| account.profile())
            .ok_or_else(|| Error::not_found("user not found").with_reason("user_not_found"))
    }
}

impl SessionVerifier for TokenService {
    fn verify(&self, token: &str) -> Result<SessionClaims, Error> {
        TokenService::verify(self, token).map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
