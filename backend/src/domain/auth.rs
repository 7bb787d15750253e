//! Authentication inputs: login credentials and registration details.
//!
//! Handlers build these from raw payload strings before calling a driving
//! port, so the services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing, blank once trimmed, or too long.
    Username(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Email was missing or malformed.
    Email(UserValidationError),
}

impl CredentialsValidationError {
    /// Name of the offending payload field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::EmptyPassword => "password",
            Self::Email(_) => "email",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn plaintext(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` satisfies [`Username`] validation and is used verbatim.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use cinephile::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "hunter2").unwrap();
/// assert_eq!(creds.username().as_str(), "alice");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(CredentialsValidationError::Username)?;
        let password = plaintext(password)?;
        Ok(Self { username, password })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up payload. The username is trimmed before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    username: Username,
    password: Zeroizing<String>,
    email: EmailAddress,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username.trim()).map_err(CredentialsValidationError::Username)?;
        let password = plaintext(password)?;
        let email = EmailAddress::new(email).map_err(CredentialsValidationError::Email)?;
        Ok(Self {
            username,
            password,
            email,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "username")]
    #[case("   ", "pw", "username")]
    #[case("user", "", "password")]
    fn invalid_credentials(#[case] username: &str, #[case] password: &str, #[case] field: &str) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    #[case(" alice", "secret")]
    #[case("bob", " padded password ")]
    fn login_credentials_are_kept_verbatim(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username().as_str(), username);
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("alice", "pw", "not-an-email", "email")]
    #[case("alice", "pw", "", "email")]
    #[case("", "pw", "a@b.c", "username")]
    #[case("alice", "", "a@b.c", "password")]
    fn invalid_registration(
        #[case] username: &str,
        #[case] password: &str,
        #[case] email: &str,
        #[case] field: &str,
    ) {
        let err = RegistrationDetails::try_from_parts(username, password, email)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn valid_registration_trims_username_and_email() {
        let details = RegistrationDetails::try_from_parts(" alice ", "pw", " alice@example.com ")
            .expect("valid registration");
        assert_eq!(details.username().as_str(), "alice");
        assert_eq!(details.password(), "pw");
        assert_eq!(details.email().as_str(), "alice@example.com");
    }
}
