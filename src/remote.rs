//! Remote identity backend: a token-issuing HTTP service.
//!
//! Wire contract: `POST /api/auth/login` takes form-urlencoded
//! `username`/`password` and returns `{access_token}`; `GET /api/auth/me`
//! takes a Bearer header and returns the identity; `POST /api/auth/signup`
//! takes a JSON body and only registers the account. The bearer token is the
//! single persisted key for this variant.

use serde::Deserialize;
use std::time::Duration;

use crate::backend::{IdentityBackend, SignupOutcome, StoredSession};
use crate::error::AuthError;
use crate::identity::{Identity, SignupData};
use crate::storage::Storage;

const TOKEN_KEY: &str = "access_token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct RemoteBackend {
    base_url: String,
    agent: ureq::Agent,
    storage: Storage,
}

impl RemoteBackend {
    pub fn new(base_url: &str, timeout_ms: u64, storage: Storage) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_millis(timeout_ms))
                .build(),
            storage,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a bearer token.
    fn request_token(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let resp = self
            .agent
            .post(&self.url("/api/auth/login"))
            .send_form(&[("username", email), ("password", password)]);

        match resp {
            Ok(r) => {
                let body: TokenResponse = r
                    .into_json()
                    .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;
                Ok(body.access_token)
            }
            Err(ureq::Error::Status(400 | 401, _)) => Err(AuthError::InvalidCredentials),
            Err(ureq::Error::Status(code, _)) => {
                Err(AuthError::NetworkFailure(format!("login returned {}", code)))
            }
            Err(e) => Err(AuthError::NetworkFailure(e.to_string())),
        }
    }

    /// Fetch the identity the token belongs to.
    fn fetch_me(&self, token: &str) -> Result<Identity, AuthError> {
        let resp = self
            .agent
            .get(&self.url("/api/auth/me"))
            .set("Authorization", &format!("Bearer {}", token))
            .call();

        match resp {
            Ok(r) => r
                .into_json()
                .map_err(|e| AuthError::NetworkFailure(e.to_string())),
            Err(ureq::Error::Status(401, _)) => Err(AuthError::InvalidCredentials),
            Err(ureq::Error::Status(code, _)) => {
                Err(AuthError::NetworkFailure(format!("me returned {}", code)))
            }
            Err(e) => Err(AuthError::NetworkFailure(e.to_string())),
        }
    }
}

impl IdentityBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn restore(&self) -> Result<Option<StoredSession>, AuthError> {
        let token = self
            .storage
            .get(TOKEN_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let Some(token) = token else {
            return Ok(None);
        };
        match self.fetch_me(&token) {
            Ok(identity) => Ok(Some(StoredSession {
                identity,
                token: Some(token),
            })),
            Err(_) => {
                // Token expired, revoked, or the service is unreachable:
                // either way the persisted session is gone.
                self.storage
                    .remove(TOKEN_KEY)
                    .map_err(|e| AuthError::Storage(e.to_string()))?;
                Ok(None)
            }
        }
    }

    fn login(&self, email: &str, password: &str) -> Result<StoredSession, AuthError> {
        let token = self.request_token(email, password)?;
        let identity = self.fetch_me(&token)?;
        // Persist only once both calls succeeded; a failed login leaves
        // storage untouched.
        self.storage
            .set(TOKEN_KEY, &token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(StoredSession {
            identity,
            token: Some(token),
        })
    }

    fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let body =
            serde_json::to_value(data).map_err(|e| AuthError::NetworkFailure(e.to_string()))?;
        let resp = self
            .agent
            .post(&self.url("/api/auth/signup"))
            .send_json(body);

        match resp {
            // The service registers the account but issues no token; the
            // caller still has to log in.
            Ok(_) => Ok(SignupOutcome::Registered),
            Err(ureq::Error::Status(400 | 409, _)) => Err(AuthError::DuplicateEmail),
            Err(ureq::Error::Status(code, _)) => Err(AuthError::NetworkFailure(format!(
                "signup returned {}",
                code
            ))),
            Err(e) => Err(AuthError::NetworkFailure(e.to_string())),
        }
    }

    fn persist_profile(&self, _identity: &Identity) -> Result<(), AuthError> {
        // Optimistic local merge only; the service exposes no profile-update
        // endpoint, so the next /api/auth/me wins.
        Ok(())
    }

    fn clear_session(&self) -> Result<(), AuthError> {
        self.storage
            .remove(TOKEN_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}
