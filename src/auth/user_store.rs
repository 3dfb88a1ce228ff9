//! User Storage
//! Mission: Persist user accounts in SQLite

use crate::auth::models::User;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record with a conflicting unique field already exists")]
    Conflict,
    #[error("no record matches the given id")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// User store with SQLite backend.
///
/// The UNIQUE constraint on email is the authoritative guard against
/// duplicate registration; callers may pre-check but must handle `Conflict`
/// from `insert` regardless.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                nickname TEXT NOT NULL DEFAULT '',
                avatar_url TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let id_str: String = row.get(0)?;
        let id = Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(User {
            id,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            nickname: row.get(3)?,
            avatar_url: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    const USER_COLUMNS: &'static str =
        "id, email, password_hash, nickname, avatar_url, created_at, updated_at";

    /// Look up a user by email.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE email = ?1",
            Self::USER_COLUMNS
        ))?;

        match stmt.query_row(params![email], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by id.
    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE id = ?1",
            Self::USER_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new user record. Fails with `Conflict` when a unique field
    /// (email) is already taken.
    pub fn insert(&self, user: &User) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let result = conn.execute(
            "INSERT INTO users (id, email, password_hash, nickname, avatar_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.email,
                user.password_hash,
                user.nickname,
                user.avatar_url,
                user.created_at,
                user.updated_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored credential entirely; no history is retained.
    pub fn update_credential(&self, id: &Uuid, password_hash: &str) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let rows = conn.execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![password_hash, Utc::now().to_rfc3339(), id.to_string()],
        )?;

        if rows == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Update the fields present in the request and return the fresh record.
    pub fn update_profile(
        &self,
        id: &Uuid,
        nickname: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<User, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        let now = Utc::now().to_rfc3339();

        let rows = match (nickname, avatar_url) {
            (Some(n), Some(a)) => conn.execute(
                "UPDATE users SET nickname = ?1, avatar_url = ?2, updated_at = ?3 WHERE id = ?4",
                params![n, a, now, id.to_string()],
            )?,
            (Some(n), None) => conn.execute(
                "UPDATE users SET nickname = ?1, updated_at = ?2 WHERE id = ?3",
                params![n, now, id.to_string()],
            )?,
            (None, Some(a)) => conn.execute(
                "UPDATE users SET avatar_url = ?1, updated_at = ?2 WHERE id = ?3",
                params![a, now, id.to_string()],
            )?,
            (None, None) => return self.find_by_id(id)?.ok_or(StoreError::NotFound),
        };

        if rows == 0 {
            return Err(StoreError::NotFound);
        }
        self.find_by_id(id)?.ok_or(StoreError::NotFound)
    }

    /// Persist the final avatar URL and return the fresh record.
    pub fn update_avatar(&self, id: &Uuid, avatar_url: &str) -> Result<User, StoreError> {
        self.update_profile(id, None, Some(avatar_url))
    }
}
