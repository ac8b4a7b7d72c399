//! Store trait

use crate::StoreResult;
use attest_config::ReportSettings;
use attest_util::UserId;

/// The credential record seeded on first run
pub const DEFAULT_USER_ID: &str = "12345";

/// The password new installs and password resets fall back to.
/// Credentials here are a demo simulation, not real authentication.
pub const DEFAULT_PASSWORD: &str = "password";

/// One simulated credential record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: UserId,
    pub password: String,
}

/// Persistence interface for attest
pub trait Store: Send + Sync {
    /// Load the persisted settings record, if any. Callers fall back to
    /// `ReportSettings::default()` when absent.
    fn load_settings(&self) -> StoreResult<Option<ReportSettings>>;

    /// Wholesale-replace the persisted settings record.
    fn save_settings(&self, settings: &ReportSettings) -> StoreResult<()>;

    /// Look up a credential by id.
    fn get_credential(&self, id: &UserId) -> StoreResult<Option<Credential>>;

    /// Insert a new credential. Returns false (and stores nothing) when
    /// the id is already registered.
    fn insert_credential(&self, credential: &Credential) -> StoreResult<bool>;

    /// Replace the password for an existing credential. Returns false
    /// when the id is unknown.
    fn set_password(&self, id: &UserId, password: &str) -> StoreResult<bool>;

    /// The currently signed-in user, if any.
    fn session(&self) -> StoreResult<Option<UserId>>;

    /// Record a signed-in session.
    fn set_session(&self, user: &UserId) -> StoreResult<()>;

    /// Clear the session (sign out).
    fn clear_session(&self) -> StoreResult<()>;

    /// Health check for diagnostics.
    fn is_healthy(&self) -> bool;
}
