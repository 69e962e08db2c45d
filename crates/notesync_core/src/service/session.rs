//! Logged-in user session.
//!
//! # Responsibility
//! - Load the current user through a `NoteDbClient` on login.
//! - Apply category/note mutations locally and forward them to the client.
//!
//! # Invariants
//! - Local state changes only when the forwarded call succeeds; a failed
//!   client call rolls the local change back.
//! - Category names stay unique per user (enforced by `User`).

use crate::client::{DbRequestError, NoteDbClient};
use crate::model::error::DataError;
use crate::model::key::UserKey;
use crate::model::user::User;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level error for login and mutation use-cases.
#[derive(Debug)]
pub enum SessionError {
    /// No user is logged in.
    NotLoggedIn,
    /// Domain rule violation.
    Data(DataError),
    /// Client call failed.
    Remote(DbRequestError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "no user is logged in"),
            Self::Data(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotLoggedIn => None,
            Self::Data(err) => Some(err),
            Self::Remote(err) => Some(err),
        }
    }
}

impl From<DataError> for SessionError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

impl From<DbRequestError> for SessionError {
    fn from(value: DbRequestError) -> Self {
        Self::Remote(value)
    }
}

/// One user's session over a note client.
pub struct NoteSession<C: NoteDbClient> {
    client: C,
    user: Option<User>,
}

impl<C: NoteDbClient> NoteSession<C> {
    pub fn new(client: C) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Logs in, replacing any current user.
    ///
    /// A user unknown to the client starts with no categories.
    ///
    /// # Errors
    /// - [`DataError::EmptyUsername`] for blank input.
    /// - [`SessionError::Remote`] when the fetch fails; the previous session
    ///   is kept in that case.
    pub fn login(&mut self, username: &str) -> SessionResult<&User> {
        let key = UserKey::parse(username)?;
        let user = match self.client.get_user(&key)? {
            Some(user) => {
                info!(
                    "event=session_login module=service status=ok user={} categories={}",
                    key.name,
                    user.category_count()
                );
                user
            }
            None => {
                info!(
                    "event=session_login module=service status=ok user={} categories=0 source=new",
                    key.name
                );
                User::from_key(key)
            }
        };
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    /// Installs an already loaded user, e.g. from a background load.
    pub fn resume(&mut self, user: User) -> &User {
        self.user.insert(user)
    }

    pub fn logout(&mut self) -> Option<User> {
        self.user.take()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Creates a category locally and on the client.
    pub fn create_category(&mut self, name: &str) -> SessionResult<()> {
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let key = user.create_category(name)?.key();

        if let Err(err) = self.client.create_category(&key) {
            warn!(
                "event=session_create_category module=service status=error user={} category={} error={}",
                key.owner, key.name, err
            );
            user.destroy_category(name);
            return Err(err.into());
        }
        Ok(())
    }

    /// Appends a note to an existing category locally and on the client.
    pub fn add_note(&mut self, category: &str, note: &str) -> SessionResult<()> {
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let target = user
            .category_mut(category)
            .ok_or_else(|| DataError::CategoryNotFound(category.to_string()))?;
        target.add_note(note);
        let key = target.key();

        if let Err(err) = self.client.add_note(&key, note) {
            warn!(
                "event=session_add_note module=service status=error user={} category={} error={}",
                key.owner, key.name, err
            );
            if let Some(target) = user.category_mut(category) {
                let last = target.len().saturating_sub(1);
                if target.notes().get(last).map(String::as_str) == Some(note) {
                    target.remove_note_at(last);
                }
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Removes the first occurrence of a note locally and on the client.
    pub fn remove_note(&mut self, category: &str, note: &str) -> SessionResult<()> {
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let target = user
            .category_mut(category)
            .ok_or_else(|| DataError::CategoryNotFound(category.to_string()))?;
        let position = target
            .remove_note(note)
            .ok_or_else(|| DataError::NoteNotFound {
                category: category.to_string(),
                note: note.to_string(),
            })?;
        let key = target.key();

        if let Err(err) = self.client.remove_note(&key, note) {
            warn!(
                "event=session_remove_note module=service status=error user={} category={} error={}",
                key.owner, key.name, err
            );
            if let Some(target) = user.category_mut(category) {
                target.insert_note(position, note);
            }
            return Err(err.into());
        }
        Ok(())
    }
}
