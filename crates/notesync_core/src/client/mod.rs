//! Note storage clients.
//!
//! # Responsibility
//! - Define the `NoteDbClient` contract used by sessions and the command queue.
//! - Provide the remote HTTP implementation and a local SQLite implementation.
//! - Surface every access failure as one `DbRequestError` type.
//!
//! # Invariants
//! - `get_user` returns `Ok(None)` for "not found or server-side error";
//!   only access failures become `Err`.
//! - Mutations are fire-and-forget: no response body is interpreted.

mod config;
mod error;
mod http;
mod sqlite;

pub use config::{ClientConfig, DEFAULT_SERVER_URL, SERVER_URL_ENV, TIMEOUT_SECS_ENV};
pub use error::{DbRequestError, DbRequestResult};
pub use http::HttpNoteDbClient;
pub use sqlite::SqliteNoteDbClient;

use crate::model::key::{CategoryKey, UserKey};
use crate::model::user::User;

/// Storage backend for users, categories and notes.
pub trait NoteDbClient {
    /// Prepares the backend for use.
    fn open(&self) -> DbRequestResult<()> {
        Ok(())
    }

    /// Fetches a fully populated user, or `None` when the backend has none.
    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>>;

    /// Appends one note to the category addressed by `key`.
    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()>;

    /// Removes one note from the category addressed by `key`.
    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()>;

    /// Creates the category addressed by `key`.
    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()>;

    /// Releases backend resources.
    fn close(&self) -> DbRequestResult<()> {
        Ok(())
    }
}

impl<C: NoteDbClient + ?Sized> NoteDbClient for &C {
    fn open(&self) -> DbRequestResult<()> {
        (**self).open()
    }

    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>> {
        (**self).get_user(key)
    }

    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        (**self).add_note(key, note)
    }

    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        (**self).remove_note(key, note)
    }

    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()> {
        (**self).create_category(key)
    }

    fn close(&self) -> DbRequestResult<()> {
        (**self).close()
    }
}

impl<C: NoteDbClient + ?Sized> NoteDbClient for std::sync::Arc<C> {
    fn open(&self) -> DbRequestResult<()> {
        (**self).open()
    }

    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>> {
        (**self).get_user(key)
    }

    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        (**self).add_note(key, note)
    }

    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        (**self).remove_note(key, note)
    }

    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()> {
        (**self).create_category(key)
    }

    fn close(&self) -> DbRequestResult<()> {
        (**self).close()
    }
}
