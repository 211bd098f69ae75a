//! User profile types shared by both identity backends.
//!
//! Wire format is camelCase JSON (`joinedDate`, `profileImage`), matching what
//! the remote service serves from `/api/auth/me` and what the mock store
//! persists on disk.

use serde::{Deserialize, Serialize};

/// Whether an account belongs to a Korean or an international student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nationality {
    Korean,
    Foreigner,
}

impl Nationality {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "korean" | "ko" | "kr" => Some(Self::Korean),
            "foreigner" | "foreign" | "international" => Some(Self::Foreigner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Korean => "korean",
            Self::Foreigner => "foreigner",
        }
    }
}

/// The durable user profile record.
///
/// `id` and `email` are immutable once the account exists; everything else can
/// change through a profile update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub university: String,
    pub nationality: Nationality,
    pub major: String,
    pub year: u32,
    #[serde(default)]
    pub bio: String,
    pub joined_date: String,
    pub profile_image: String,
}

/// Fields collected by the signup form. Serialized as the JSON body of
/// `POST /api/auth/signup` for the remote backend.
#[derive(Debug, Clone, Serialize)]
pub struct SignupData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub university: String,
    pub nationality: Nationality,
    pub major: String,
    pub year: u32,
}

/// A partial profile edit. `None` fields are left untouched; id and email are
/// not editable at all.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub university: Option<String>,
    pub nationality: Option<Nationality>,
    pub major: Option<String>,
    pub year: Option<u32>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.university.is_none()
            && self.nationality.is_none()
            && self.major.is_none()
            && self.year.is_none()
            && self.bio.is_none()
            && self.profile_image.is_none()
    }

    /// Names of the fields this update touches, for the audit log.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.university.is_some() {
            fields.push("university");
        }
        if self.nationality.is_some() {
            fields.push("nationality");
        }
        if self.major.is_some() {
            fields.push("major");
        }
        if self.year.is_some() {
            fields.push("year");
        }
        if self.bio.is_some() {
            fields.push("bio");
        }
        if self.profile_image.is_some() {
            fields.push("profileImage");
        }
        fields
    }

    /// Merge this update into an identity, leaving unset fields as they were.
    pub fn apply(&self, identity: &mut Identity) {
        if let Some(name) = &self.name {
            identity.name = name.clone();
        }
        if let Some(university) = &self.university {
            identity.university = university.clone();
        }
        if let Some(nationality) = self.nationality {
            identity.nationality = nationality;
        }
        if let Some(major) = &self.major {
            identity.major = major.clone();
        }
        if let Some(year) = self.year {
            identity.year = year;
        }
        if let Some(bio) = &self.bio {
            identity.bio = bio.clone();
        }
        if let Some(profile_image) = &self.profile_image {
            identity.profile_image = profile_image.clone();
        }
    }
}

/// Deterministic placeholder avatar for a new account, seeded by display name.
pub fn avatar_url(name: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/initials/svg?seed={}",
        percent_encode(name)
    )
}

/// Percent-encode a query value (RFC 3986 unreserved characters pass through).
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> Identity {
        Identity {
            id: "1700000000000".to_string(),
            email: "a@x.com".to_string(),
            name: "Lee".to_string(),
            university: "Yonsei".to_string(),
            nationality: Nationality::Korean,
            major: "CS".to_string(),
            year: 2,
            bio: String::new(),
            joined_date: "2026-08-28".to_string(),
            profile_image: avatar_url("Lee"),
        }
    }

    #[test]
    fn test_identity_wire_keys_are_camel_case() {
        let json = serde_json::to_string(&sample_identity()).unwrap();
        assert!(json.contains("\"joinedDate\""));
        assert!(json.contains("\"profileImage\""));
        assert!(json.contains("\"nationality\":\"korean\""));
    }

    #[test]
    fn test_identity_round_trip() {
        let identity = sample_identity();
        let json = serde_json::to_string(&identity).unwrap();
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn test_signup_body_has_password_and_flat_fields() {
        let data = SignupData {
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
            name: "Lee".to_string(),
            university: "Yonsei".to_string(),
            nationality: Nationality::Foreigner,
            major: "CS".to_string(),
            year: 2,
        };
        let json: serde_json::Value = serde_json::to_value(&data).unwrap();
        assert_eq!(json["password"], "secret");
        assert_eq!(json["nationality"], "foreigner");
        assert_eq!(json["year"], 2);
    }

    #[test]
    fn test_profile_update_merges_only_set_fields() {
        let mut identity = sample_identity();
        let update = ProfileUpdate {
            bio: Some("hello".to_string()),
            ..Default::default()
        };
        update.apply(&mut identity);
        assert_eq!(identity.bio, "hello");
        assert_eq!(identity.name, "Lee");
        assert_eq!(identity.university, "Yonsei");
    }

    #[test]
    fn test_avatar_url_plain_ascii_seed() {
        let url = avatar_url("Lee");
        assert!(url.ends_with("seed=Lee"));
    }

    #[test]
    fn test_avatar_url_encodes_spaces_and_hangul() {
        let url = avatar_url("Kim Minji");
        assert!(url.ends_with("seed=Kim%20Minji"));
        let url = avatar_url("김");
        assert!(url.ends_with("seed=%EA%B9%80"));
    }

    #[test]
    fn test_nationality_parse() {
        assert_eq!(Nationality::from_str("korean"), Some(Nationality::Korean));
        assert_eq!(
            Nationality::from_str("International"),
            Some(Nationality::Foreigner)
        );
        assert_eq!(Nationality::from_str("martian"), None);
    }
}
