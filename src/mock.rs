//! Embedded identity backend: a users database persisted in client storage.
//!
//! Storage layout mirrors the two localStorage keys of the original demo:
//! `users` holds a JSON map from email to credential record, `current_user`
//! holds the active session's identity (no password material). Credential
//! records keep a per-user salt and SHA-256 hash rather than the password
//! itself.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::backend::{IdentityBackend, SignupOutcome, StoredSession};
use crate::error::AuthError;
use crate::identity::{self, Identity, SignupData};
use crate::storage::Storage;

const USERS_KEY: &str = "users";
const CURRENT_USER_KEY: &str = "current_user";

/// One registered account: the profile plus its credential material.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CredentialRecord {
    #[serde(flatten)]
    identity: Identity,
    salt: String,
    password_hash: String,
}

pub struct MockBackend {
    storage: Storage,
}

impl MockBackend {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn load_users(&self) -> Result<HashMap<String, CredentialRecord>, AuthError> {
        let raw = self
            .storage
            .get(USERS_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        match raw {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| AuthError::Storage(e.to_string()))
            }
            None => Ok(HashMap::new()),
        }
    }

    fn save_users(&self, users: &HashMap<String, CredentialRecord>) -> Result<(), AuthError> {
        let json = serde_json::to_string(users).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .set(USERS_KEY, &json)
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    fn save_current(&self, identity: &Identity) -> Result<(), AuthError> {
        let json =
            serde_json::to_string(identity).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .set(CURRENT_USER_KEY, &json)
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

impl IdentityBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn restore(&self) -> Result<Option<StoredSession>, AuthError> {
        let raw = self
            .storage
            .get(CURRENT_USER_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let Some(json) = raw else {
            return Ok(None);
        };
        match serde_json::from_str::<Identity>(&json) {
            Ok(identity) => Ok(Some(StoredSession {
                identity,
                token: None,
            })),
            Err(_) => {
                // Unreadable mirror: clear it and start unauthenticated.
                self.storage
                    .remove(CURRENT_USER_KEY)
                    .map_err(|e| AuthError::Storage(e.to_string()))?;
                Ok(None)
            }
        }
    }

    fn login(&self, email: &str, password: &str) -> Result<StoredSession, AuthError> {
        let users = self.load_users()?;
        let record = users.get(email).ok_or(AuthError::InvalidCredentials)?;
        if hash_password(&record.salt, password) != record.password_hash {
            return Err(AuthError::InvalidCredentials);
        }
        self.save_current(&record.identity)?;
        Ok(StoredSession {
            identity: record.identity.clone(),
            token: None,
        })
    }

    fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let mut users = self.load_users()?;
        if users.contains_key(&data.email) {
            return Err(AuthError::DuplicateEmail);
        }

        let now = Utc::now();
        let identity = Identity {
            id: now.timestamp_millis().to_string(),
            email: data.email.clone(),
            name: data.name.clone(),
            university: data.university.clone(),
            nationality: data.nationality,
            major: data.major.clone(),
            year: data.year,
            bio: String::new(),
            joined_date: now.format("%Y-%m-%d").to_string(),
            profile_image: identity::avatar_url(&data.name),
        };

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let record = CredentialRecord {
            identity: identity.clone(),
            password_hash: hash_password(&salt, &data.password),
            salt,
        };
        users.insert(data.email.clone(), record);
        self.save_users(&users)?;
        self.save_current(&identity)?;

        Ok(SignupOutcome::SignedIn(StoredSession {
            identity,
            token: None,
        }))
    }

    fn persist_profile(&self, identity: &Identity) -> Result<(), AuthError> {
        self.save_current(identity)?;

        // Mirror the edit into the users database so the next login sees it.
        let mut users = self.load_users()?;
        if let Some(record) = users.get_mut(&identity.email) {
            record.identity = identity.clone();
            self.save_users(&users)?;
        }
        Ok(())
    }

    fn clear_session(&self) -> Result<(), AuthError> {
        self.storage
            .remove(CURRENT_USER_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}
