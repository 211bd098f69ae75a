//! Error taxonomy for session/auth operations.
//!
//! Backends report a small, closed set of failure modes; the CLI maps each one
//! to a locale-appropriate message. No variant is fatal to the process.

/// A form-level check that failed before the store was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    EmailFormat,
    PasswordTooShort,
    PasswordMismatch,
}

/// Failure modes of login/signup/logout/profile operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No matching account, or the password did not verify.
    InvalidCredentials,
    /// Signup attempted with an email that already has an account.
    DuplicateEmail,
    /// A remote call failed (transport error, timeout, or non-auth HTTP status).
    NetworkFailure(String),
    /// A caller-side form check failed.
    Validation(ValidationKind),
    /// The persisted key-value storage could not be read or written.
    Storage(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid email or password"),
            AuthError::DuplicateEmail => write!(f, "email already registered"),
            AuthError::NetworkFailure(detail) => write!(f, "network failure: {}", detail),
            AuthError::Validation(ValidationKind::EmailFormat) => {
                write!(f, "invalid email address")
            }
            AuthError::Validation(ValidationKind::PasswordTooShort) => {
                write!(f, "password too short")
            }
            AuthError::Validation(ValidationKind::PasswordMismatch) => {
                write!(f, "passwords do not match")
            }
            AuthError::Storage(detail) => write!(f, "storage failure: {}", detail),
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_detail() {
        let err = AuthError::NetworkFailure("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_validation_variants_distinct() {
        assert_ne!(
            AuthError::Validation(ValidationKind::PasswordTooShort),
            AuthError::Validation(ValidationKind::PasswordMismatch)
        );
    }
}
