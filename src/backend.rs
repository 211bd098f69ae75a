//! The seam between the session store and its identity backend.

use crate::error::AuthError;
use crate::identity::{Identity, SignupData};

/// A session as the backend hands it back: the authenticated identity, plus a
/// bearer token when the backend issues one.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub identity: Identity,
    pub token: Option<String>,
}

/// What a successful signup left behind. The mock backend signs the new
/// account in immediately; the remote service only registers it.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    SignedIn(StoredSession),
    Registered,
}

/// Trait for identity backends to allow swapping the embedded mock store and
/// the remote token service behind one interface.
///
/// The backend owns all persistence for its variant: the mock store keeps the
/// identity database and the `current_user` mirror, the remote backend keeps
/// the bearer token. The session store on top holds only in-memory state.
pub trait IdentityBackend {
    /// Short name for diagnostics and the audit log.
    fn name(&self) -> &'static str;

    /// Rebuild the session from persisted state at startup. Invalid persisted
    /// data is cleared and reported as `None`, never as an error.
    fn restore(&self) -> Result<Option<StoredSession>, AuthError>;

    fn login(&self, email: &str, password: &str) -> Result<StoredSession, AuthError>;

    fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError>;

    /// Make a merged profile durable, to whatever extent this variant supports.
    fn persist_profile(&self, identity: &Identity) -> Result<(), AuthError>;

    /// Drop the persisted session (token or current-user mirror). The identity
    /// database itself is untouched.
    fn clear_session(&self) -> Result<(), AuthError>;
}
