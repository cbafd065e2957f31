use secrecy::{ExposeSecret, Secret};

/// Minimum password length (excluding spaces)
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Maximum password length (including all characters)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validation result for password checks
#[derive(Debug, PartialEq)]
pub enum PasswordValidationError {
    TooShort,
    TooLong,
}

impl std::fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordValidationError::TooShort => write!(
                f,
                "The test user password needs at least {} characters (excluding spaces).",
                MIN_PASSWORD_LENGTH
            ),
            PasswordValidationError::TooLong => write!(
                f,
                "The test user password must not exceed {} characters.",
                MAX_PASSWORD_LENGTH
            ),
        }
    }
}

/// The password the test user signs up and signs in with.
#[derive(Debug, Clone)]
pub struct UserPassword(Secret<String>);

impl UserPassword {
    /// Validates that a password meets length requirements
    ///
    /// Requirements:
    /// - At least MIN_PASSWORD_LENGTH characters (excluding spaces)
    /// - At most MAX_PASSWORD_LENGTH characters (including spaces)
    pub fn parse(password: Secret<String>) -> Result<Self, PasswordValidationError> {
        let password_str = password.expose_secret();

        if password_str.replace(' ', "").chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordValidationError::TooShort);
        }

        if password_str.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(PasswordValidationError::TooLong);
        }

        Ok(Self(password))
    }
}

impl ExposeSecret<String> for UserPassword {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
