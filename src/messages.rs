//! Bilingual user-facing strings. The store reports typed errors; picking the
//! Korean or English wording is the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Korean,
    #[default]
    English,
}

impl Locale {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "korean" | "ko" | "kr" => Some(Self::Korean),
            "english" | "en" => Some(Self::English),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Korean => "korean",
            Self::English => "english",
        }
    }
}

/// Message for a failed operation.
pub fn auth_error(err: &AuthError, locale: Locale) -> &'static str {
    match (err, locale) {
        (AuthError::InvalidCredentials, Locale::Korean) => {
            "이메일 또는 비밀번호가 올바르지 않습니다."
        }
        (AuthError::InvalidCredentials, Locale::English) => "Invalid email or password.",
        (AuthError::DuplicateEmail, Locale::Korean) => "이미 등록된 이메일입니다.",
        (AuthError::DuplicateEmail, Locale::English) => "Email already registered.",
        (AuthError::Validation(ValidationKind::PasswordMismatch), Locale::Korean) => {
            "비밀번호가 일치하지 않습니다."
        }
        (AuthError::Validation(ValidationKind::PasswordMismatch), Locale::English) => {
            "Passwords do not match."
        }
        (AuthError::Validation(ValidationKind::PasswordTooShort), Locale::Korean) => {
            "비밀번호는 6자 이상이어야 합니다."
        }
        (AuthError::Validation(ValidationKind::PasswordTooShort), Locale::English) => {
            "Password must be at least 6 characters."
        }
        (AuthError::Validation(ValidationKind::EmailFormat), Locale::Korean) => {
            "올바른 이메일 주소를 입력하세요."
        }
        (AuthError::Validation(ValidationKind::EmailFormat), Locale::English) => {
            "Enter a valid email address."
        }
        (AuthError::NetworkFailure(_) | AuthError::Storage(_), Locale::Korean) => {
            "오류가 발생했습니다."
        }
        (AuthError::NetworkFailure(_) | AuthError::Storage(_), Locale::English) => {
            "An error occurred."
        }
    }
}

pub fn signed_in(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "로그인되었습니다.",
        Locale::English => "Signed in.",
    }
}

pub fn signed_out(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "로그아웃되었습니다.",
        Locale::English => "Signed out.",
    }
}

pub fn welcome(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "가입을 환영합니다!",
        Locale::English => "Welcome aboard!",
    }
}

pub fn account_created_sign_in(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "계정이 생성되었습니다. 로그인해주세요.",
        Locale::English => "Account created. Please sign in.",
    }
}

pub fn not_signed_in(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "로그인이 필요합니다.",
        Locale::English => "You are not signed in.",
    }
}

pub fn profile_updated(locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => "프로필이 업데이트되었습니다.",
        Locale::English => "Profile updated.",
    }
}
