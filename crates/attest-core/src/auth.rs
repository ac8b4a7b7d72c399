//! Simulated authentication flows
//!
//! Credentials are plain records in the store and exist only so the
//! tool has a sign-in gate; this is a demo simulation, not real
//! authentication.

use std::sync::Arc;

use attest_store::{Credential, Store, StoreError, DEFAULT_PASSWORD};
use attest_util::UserId;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid ID or password")]
    InvalidCredentials,

    #[error("User ID {0} already exists")]
    DuplicateId(UserId),

    #[error("User ID {0} not found")]
    UnknownId(UserId),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Credential flows over the persistence layer
pub struct Authenticator {
    store: Arc<dyn Store>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Sign in with an id and password. On success the session is
    /// recorded in the store. A wrong id and a wrong password produce
    /// the same error.
    pub fn sign_in(&self, id: &UserId, password: &str) -> AuthResult<()> {
        let credential = self.store.get_credential(id)?;

        match credential {
            Some(c) if c.password == password => {
                self.store.set_session(id)?;
                info!(user_id = %id, "Signed in");
                Ok(())
            }
            _ => {
                warn!(user_id = %id, "Sign-in rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Register a new credential. Does not sign the user in.
    pub fn sign_up(&self, id: &UserId, password: &str, confirm: &str) -> AuthResult<()> {
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let inserted = self.store.insert_credential(&Credential {
            id: id.clone(),
            password: password.to_owned(),
        })?;
        if !inserted {
            return Err(AuthError::DuplicateId(id.clone()));
        }

        info!(user_id = %id, "Credential registered");
        Ok(())
    }

    /// Reset an existing credential back to the default password.
    pub fn reset_password(&self, id: &UserId) -> AuthResult<()> {
        let updated = self.store.set_password(id, DEFAULT_PASSWORD)?;
        if !updated {
            return Err(AuthError::UnknownId(id.clone()));
        }

        info!(user_id = %id, "Password reset to default");
        Ok(())
    }

    /// Clear the current session. Signing out while signed out is fine.
    pub fn sign_out(&self) -> AuthResult<()> {
        self.store.clear_session()?;
        info!("Signed out");
        Ok(())
    }

    /// The currently signed-in user, if any.
    pub fn current_user(&self) -> AuthResult<Option<UserId>> {
        Ok(self.store.session()?)
    }
}
