//! SQLite-based store implementation

use attest_config::{parse_settings, settings_to_json, ReportSettings};
use attest_util::UserId;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{Credential, Store, StoreResult, DEFAULT_PASSWORD, DEFAULT_USER_ID};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Settings record (single row, replaced wholesale)
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                settings_json TEXT NOT NULL
            );

            -- Simulated credential records
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                password TEXT NOT NULL
            );

            -- Current session (single row)
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_id TEXT NOT NULL
            );
            "#,
        )?;

        // Seed the default credential on first run only.
        let user_count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if user_count == 0 {
            conn.execute(
                "INSERT INTO users (id, password) VALUES (?, ?)",
                params![DEFAULT_USER_ID, DEFAULT_PASSWORD],
            )?;
            debug!(user_id = DEFAULT_USER_ID, "Default credential seeded");
        }

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn load_settings(&self) -> StoreResult<Option<ReportSettings>> {
        let conn = self.conn.lock().unwrap();

        let json: Option<String> = conn
            .query_row("SELECT settings_json FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(s) => Ok(Some(parse_settings(&s)?)),
            None => Ok(None),
        }
    }

    fn save_settings(&self, settings: &ReportSettings) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let json = settings_to_json(settings)?;

        conn.execute(
            r#"
            INSERT INTO settings (id, settings_json)
            VALUES (1, ?)
            ON CONFLICT(id)
            DO UPDATE SET settings_json = excluded.settings_json
            "#,
            [json],
        )?;

        debug!("Settings saved");
        Ok(())
    }

    fn get_credential(&self, id: &UserId) -> StoreResult<Option<Credential>> {
        let conn = self.conn.lock().unwrap();

        let password: Option<String> = conn
            .query_row(
                "SELECT password FROM users WHERE id = ?",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(password.map(|password| Credential {
            id: id.clone(),
            password,
        }))
    }

    fn insert_credential(&self, credential: &Credential) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, password) VALUES (?, ?)",
            params![credential.id.as_str(), credential.password],
        )?;

        debug!(user_id = %credential.id, inserted = inserted > 0, "Credential insert");
        Ok(inserted > 0)
    }

    fn set_password(&self, id: &UserId, password: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let updated = conn.execute(
            "UPDATE users SET password = ? WHERE id = ?",
            params![password, id.as_str()],
        )?;

        debug!(user_id = %id, updated = updated > 0, "Password updated");
        Ok(updated > 0)
    }

    fn session(&self) -> StoreResult<Option<UserId>> {
        let conn = self.conn.lock().unwrap();

        let user_id: Option<String> = conn
            .query_row("SELECT user_id FROM session WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(user_id.map(UserId::new))
    }

    fn set_session(&self, user: &UserId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO session (id, user_id)
            VALUES (1, ?)
            ON CONFLICT(id)
            DO UPDATE SET user_id = excluded.user_id
            "#,
            [user.as_str()],
        )?;

        debug!(user_id = %user, "Session recorded");
        Ok(())
    }

    fn clear_session(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM session WHERE id = 1", [])?;
        debug!("Session cleared");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_config::TableTheme;

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn test_settings_absent_then_saved() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.load_settings().unwrap().is_none());

        let mut settings = ReportSettings::default();
        settings.company_name = "Acme Test Labs".into();
        store.save_settings(&settings).unwrap();

        let loaded = store.load_settings().unwrap().unwrap();
        assert_eq!(loaded, settings);

        // Saves are wholesale replacements.
        settings.table_theme = TableTheme::Plain;
        store.save_settings(&settings).unwrap();
        let loaded = store.load_settings().unwrap().unwrap();
        assert_eq!(loaded.table_theme, TableTheme::Plain);
    }

    #[test]
    fn test_default_credential_seeded() {
        let store = SqliteStore::in_memory().unwrap();

        let cred = store
            .get_credential(&UserId::new(DEFAULT_USER_ID))
            .unwrap()
            .unwrap();
        assert_eq!(cred.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn test_duplicate_credential_rejected() {
        let store = SqliteStore::in_memory().unwrap();

        let cred = Credential {
            id: UserId::new("54321"),
            password: "secret".into(),
        };
        assert!(store.insert_credential(&cred).unwrap());
        assert!(!store.insert_credential(&cred).unwrap());

        // The original record is untouched.
        let stored = store.get_credential(&cred.id).unwrap().unwrap();
        assert_eq!(stored.password, "secret");
    }

    #[test]
    fn test_set_password_unknown_user() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(!store
            .set_password(&UserId::new("nobody"), "pw")
            .unwrap());
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.session().unwrap().is_none());

        let user = UserId::new("12345");
        store.set_session(&user).unwrap();
        assert_eq!(store.session().unwrap(), Some(user.clone()));

        // Signing in as someone else replaces the session.
        let other = UserId::new("54321");
        store.set_session(&other).unwrap();
        assert_eq!(store.session().unwrap(), Some(other));

        store.clear_session().unwrap();
        assert!(store.session().unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("attest.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            let mut settings = ReportSettings::default();
            settings.tester_name = "R. Osei".into();
            store.save_settings(&settings).unwrap();
            store.set_session(&UserId::new("12345")).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        let settings = store.load_settings().unwrap().unwrap();
        assert_eq!(settings.tester_name, "R. Osei");
        assert_eq!(store.session().unwrap(), Some(UserId::new("12345")));

        // Reopening must not re-seed over existing users.
        let cred = store
            .get_credential(&UserId::new(DEFAULT_USER_ID))
            .unwrap();
        assert!(cred.is_some());
    }
}
