//! Local SQLite-backed note client.
//!
//! # Responsibility
//! - Implement `NoteDbClient` over the local cache schema.
//! - Persist full user snapshots fetched from the remote service.
//!
//! # Invariants
//! - Mutations create missing user/category rows, like the remote service.
//! - Notes are returned in `position ASC, id ASC` order.
//! - `remove_note` deletes only the first matching note.

use super::error::{DbRequestError, DbRequestResult};
use super::NoteDbClient;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::category::Category;
use crate::model::key::{CategoryKey, UserKey};
use crate::model::user::User;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Note client persisting to a local SQLite database.
#[derive(Debug)]
pub struct SqliteNoteDbClient {
    conn: Mutex<Connection>,
}

impl SqliteNoteDbClient {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) the cache file at `path`.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an in-memory cache.
    pub fn in_memory() -> Result<Self, DbError> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Replaces the stored snapshot of `user` in one transaction.
    pub fn put_user(&self, user: &User) -> DbRequestResult<()> {
        const OPERATION: &str = "put_user";
        let mut conn = self.lock();
        let tx = conn
            .transaction()
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;

        tx.execute("DELETE FROM users WHERE name = ?1;", [user.name()])
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;
        tx.execute("INSERT INTO users (name) VALUES (?1);", [user.name()])
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;

        for category in user.categories() {
            tx.execute(
                "INSERT INTO categories (owner, name) VALUES (?1, ?2);",
                params![user.name(), category.name()],
            )
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;
            for (position, note) in category.notes().iter().enumerate() {
                tx.execute(
                    "INSERT INTO notes (owner, category, content, position)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![user.name(), category.name(), note, position as i64],
                )
                .map_err(|err| DbRequestError::storage(OPERATION, err))?;
            }
        }

        tx.commit()
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;
        info!(
            "event=cache_put_user module=client status=ok user={} categories={}",
            user.name(),
            user.category_count()
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves SQLite consistent; reuse the connection.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NoteDbClient for SqliteNoteDbClient {
    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>> {
        const OPERATION: &str = "get_user";
        let conn = self.lock();
        load_user(&conn, key).map_err(|err| DbRequestError::storage(OPERATION, err))
    }

    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        const OPERATION: &str = "add_note";
        let conn = self.lock();
        ensure_category(&conn, key).map_err(|err| DbRequestError::storage(OPERATION, err))?;
        conn.execute(
            "INSERT INTO notes (owner, category, content, position)
             VALUES (
                ?1, ?2, ?3,
                (SELECT COALESCE(MAX(position) + 1, 0)
                 FROM notes
                 WHERE owner = ?1 AND category = ?2)
             );",
            params![key.owner.name, key.name, note],
        )
        .map_err(|err| DbRequestError::storage(OPERATION, err))?;
        debug!(
            "event=cache_add_note module=client status=ok user={} category={}",
            key.owner.name, key.name
        );
        Ok(())
    }

    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        const OPERATION: &str = "remove_note";
        let conn = self.lock();
        let removed = conn
            .execute(
                "DELETE FROM notes
                 WHERE id = (
                    SELECT id FROM notes
                    WHERE owner = ?1 AND category = ?2 AND content = ?3
                    ORDER BY position ASC, id ASC
                    LIMIT 1
                 );",
                params![key.owner.name, key.name, note],
            )
            .map_err(|err| DbRequestError::storage(OPERATION, err))?;
        debug!(
            "event=cache_remove_note module=client status=ok user={} category={} removed={}",
            key.owner.name, key.name, removed
        );
        Ok(())
    }

    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()> {
        const OPERATION: &str = "create_category";
        let conn = self.lock();
        ensure_category(&conn, key).map_err(|err| DbRequestError::storage(OPERATION, err))
    }
}

fn ensure_category(conn: &Connection, key: &CategoryKey) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (name) VALUES (?1);",
        [key.owner.name.as_str()],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO categories (owner, name) VALUES (?1, ?2);",
        params![key.owner.name, key.name],
    )?;
    Ok(())
}

fn load_user(conn: &Connection, key: &UserKey) -> rusqlite::Result<Option<User>> {
    let exists = conn
        .query_row(
            "SELECT name FROM users WHERE name = ?1;",
            [key.name.as_str()],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(None);
    }

    let mut user = User::from_key(key.clone());
    let mut categories_stmt =
        conn.prepare("SELECT name FROM categories WHERE owner = ?1 ORDER BY name ASC;")?;
    let mut notes_stmt = conn.prepare(
        "SELECT content FROM notes
         WHERE owner = ?1 AND category = ?2
         ORDER BY position ASC, id ASC;",
    )?;

    let names = categories_stmt
        .query_map([key.name.as_str()], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for name in names {
        let notes = notes_stmt
            .query_map(params![key.name, name], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        // Rows are filtered by owner and keyed by the categories primary key.
        let _ = user.insert_category(Category::with_notes(key.clone(), name, notes));
    }

    Ok(Some(user))
}
