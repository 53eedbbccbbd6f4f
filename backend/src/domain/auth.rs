//! Credentials supplied at login and registration.
//!
//! Passwords are held in [`Zeroizing`] buffers so they are wiped once the
//! hasher has consumed them.

use zeroize::Zeroizing;

use super::{Role, UserValidationError, Username};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// bcrypt only reads the first 72 bytes of its input.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Validation failures for credential payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Username and password presented at login.
///
/// The username is trimmed but otherwise unchecked so that a malformed name
/// fails as "invalid credentials" rather than leaking the naming rules.
///
/// # Examples
/// ```
/// use rideshare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter22").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// Password whitespace is preserved as typed.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        let role = role.parse::<Role>()?;
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
