//! The session store: the one owner of the current authenticated identity.
//!
//! Constructed once at startup and passed down to every command handler. The
//! store starts in a transient initializing state inside [`SessionStore::open`]
//! and settles into authenticated or unauthenticated before it is handed out;
//! afterwards every mutation goes through login/signup/logout/update_profile
//! and is mirrored to persisted storage by the backend.

use crate::backend::{IdentityBackend, SignupOutcome, StoredSession};
use crate::error::AuthError;
use crate::identity::{Identity, ProfileUpdate, SignupData};

pub struct SessionStore {
    backend: Box<dyn IdentityBackend>,
    session: Option<StoredSession>,
}

impl SessionStore {
    /// Build the store and reconstruct the session from persisted state.
    /// Missing or invalid persisted data yields an unauthenticated store, not
    /// an error; the restore itself already cleared whatever was stale.
    pub fn open(backend: Box<dyn IdentityBackend>) -> Self {
        let session = backend.restore().unwrap_or(None);
        Self { backend, session }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.token.as_deref())
    }

    /// Authenticate with email and password. On failure the current state and
    /// persisted storage are left untouched.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let session = self.backend.login(email, password)?;
        self.session = Some(session);
        Ok(())
    }

    /// Create an account. Whether the store ends up authenticated depends on
    /// the backend: the mock store signs the new account in, the remote
    /// service only registers it.
    pub fn signup(&mut self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let outcome = self.backend.signup(data)?;
        if let SignupOutcome::SignedIn(session) = &outcome {
            self.session = Some(session.clone());
        }
        Ok(outcome)
    }

    /// End the session. Idempotent; the identity database keeps the account.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session = None;
        self.backend.clear_session()
    }

    /// Merge partial fields into the current profile and re-persist. Returns
    /// `false` without touching anything when no one is signed in.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<bool, AuthError> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        let mut merged = session.identity.clone();
        update.apply(&mut merged);
        self.backend.persist_profile(&merged)?;
        if let Some(session) = &mut self.session {
            session.identity = merged;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Nationality;
    use crate::mock::MockBackend;
    use crate::storage::Storage;
    use std::path::Path;

    fn open_store(dir: &Path) -> SessionStore {
        let storage = Storage::open(dir).unwrap();
        SessionStore::open(Box::new(MockBackend::new(storage)))
    }

    fn lee_signup() -> SignupData {
        SignupData {
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
            name: "Lee".to_string(),
            university: "Yonsei".to_string(),
            nationality: Nationality::Korean,
            major: "CS".to_string(),
            year: 2,
        }
    }

    #[test]
    fn test_fresh_store_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_signup_then_reload_restores_identical_identity() {
        let dir = tempfile::tempdir().unwrap();
        let before = {
            let mut store = open_store(dir.path());
            store.signup(&lee_signup()).unwrap();
            assert!(store.is_authenticated());
            store.user().unwrap().clone()
        };

        let store = open_store(dir.path());
        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap(), &before);
    }

    #[test]
    fn test_login_with_empty_email_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        assert_eq!(
            store.login("  ", "secret").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_failed_login_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.signup(&lee_signup()).unwrap();
        store.logout().unwrap();

        assert!(store.login("a@x.com", "wrong").is_err());
        assert!(!store.is_authenticated());

        let reloaded = open_store(dir.path());
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_logout_then_reload_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = open_store(dir.path());
            store.signup(&lee_signup()).unwrap();
            store.logout().unwrap();
            // Idempotent.
            store.logout().unwrap();
            assert!(!store.is_authenticated());
        }
        let store = open_store(dir.path());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_profile_changes_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.signup(&lee_signup()).unwrap();
        let before = store.user().unwrap().clone();

        let update = ProfileUpdate {
            bio: Some("x".to_string()),
            ..Default::default()
        };
        assert!(store.update_profile(&update).unwrap());

        let after = store.user().unwrap().clone();
        assert_eq!(after.bio, "x");
        assert_eq!(after.name, before.name);
        assert_eq!(after.id, before.id);
        assert_eq!(after.email, before.email);
        assert_eq!(after.university, before.university);
        assert_eq!(after.joined_date, before.joined_date);

        // Persisted copy matches the in-memory one.
        let reloaded = open_store(dir.path());
        assert_eq!(reloaded.user().unwrap(), &after);
    }

    #[test]
    fn test_update_profile_unauthenticated_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        let update = ProfileUpdate {
            bio: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!store.update_profile(&update).unwrap());

        let reloaded = open_store(dir.path());
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_signup_end_to_end_identity_shape() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.signup(&lee_signup()).unwrap();

        let user = store.user().unwrap();
        assert_eq!(user.name, "Lee");
        assert_eq!(user.bio, "");
        assert_eq!(
            user.joined_date,
            chrono::Utc::now().format("%Y-%m-%d").to_string()
        );
        assert!(user.profile_image.contains("Lee"));
        assert!(user.id.parse::<i64>().is_ok());
    }
}
