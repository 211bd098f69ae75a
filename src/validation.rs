//! Form-level checks the CLI runs before touching the session store.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AuthError, ValidationKind};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Campus choices offered by the interactive signup prompt; free text is also
/// accepted.
pub const UNIVERSITIES: &[&str] = &[
    "서울대학교",
    "연세대학교",
    "고려대학교",
    "성균관대학교",
    "한양대학교",
    "중앙대학교",
    "경희대학교",
    "서강대학교",
    "이화여자대학교",
    "홍익대학교",
    "경북대학교",
    "KAIST",
    "POSTECH",
    "Other / 기타",
];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub fn check_email(email: &str) -> Result<(), AuthError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::Validation(ValidationKind::EmailFormat))
    }
}

pub fn check_password(password: &str, confirm: &str) -> Result<(), AuthError> {
    if password != confirm {
        return Err(AuthError::Validation(ValidationKind::PasswordMismatch));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(ValidationKind::PasswordTooShort));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_email_accepts_plain_addresses() {
        assert!(check_email("user@example.com").is_ok());
        assert!(check_email("test.name@yonsei.ac.kr").is_ok());
    }

    #[test]
    fn test_check_email_rejects_malformed() {
        assert!(check_email("invalid").is_err());
        assert!(check_email("no-at-sign.com").is_err());
        assert!(check_email("a b@x.com").is_err());
        assert!(check_email("a@x").is_err());
    }

    #[test]
    fn test_check_password_mismatch_beats_length() {
        assert_eq!(
            check_password("abc", "abd").unwrap_err(),
            AuthError::Validation(ValidationKind::PasswordMismatch)
        );
    }

    #[test]
    fn test_check_password_length() {
        assert_eq!(
            check_password("short", "short").unwrap_err(),
            AuthError::Validation(ValidationKind::PasswordTooShort)
        );
        assert!(check_password("secret", "secret").is_ok());
    }

    #[test]
    fn test_check_password_counts_chars_not_bytes() {
        // Six Hangul syllables are more than six bytes but still valid.
        assert!(check_password("비밀번호테스트", "비밀번호테스트").is_ok());
    }
}
