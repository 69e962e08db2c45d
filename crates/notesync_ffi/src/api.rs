//! FFI use-case API for the mobile shell.
//!
//! # Responsibility
//! - Expose login and category/note use-cases to Dart via FRB.
//! - Hold the single process-wide session behind a mutex.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported through `ok=false` envelopes, never thrown.

use log::warn;
use notesync_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ClientConfig, HttpNoteDbClient, NoteSession, Parcelable, User,
};
use std::sync::{Mutex, MutexGuard, OnceLock};

type RemoteSession = NoteSession<HttpNoteDbClient>;

static SESSION: OnceLock<Mutex<Option<RemoteSession>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One category as shown by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub name: String,
    pub notes: Vec<String>,
}

/// Session state envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub ok: bool,
    /// Logged-in username, when any.
    pub username: Option<String>,
    /// Categories sorted by name.
    pub categories: Vec<CategoryView>,
    pub message: String,
}

impl SessionResponse {
    fn from_user(user: Option<&User>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            username: user.map(|user| user.name().to_string()),
            categories: user.map(category_views).unwrap_or_default(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            username: None,
            categories: Vec::new(),
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Logs in against the configured server and returns the loaded categories.
///
/// # FFI contract
/// - Sync call, performs one network request.
/// - Unknown users start with no categories.
#[flutter_rust_bridge::frb(sync)]
pub fn session_login(username: String) -> SessionResponse {
    let mut guard = lock_session();
    let session = match ensure_session(&mut guard) {
        Ok(session) => session,
        Err(err) => return SessionResponse::failure(format!("session_login failed: {err}")),
    };
    match session.login(username.as_str()) {
        Ok(user) => SessionResponse::from_user(Some(user), "Logged in."),
        Err(err) => SessionResponse::failure(format!("session_login failed: {err}")),
    }
}

/// Drops the current user.
#[flutter_rust_bridge::frb(sync)]
pub fn session_logout() -> ActionResponse {
    let mut guard = lock_session();
    match guard.as_mut().and_then(RemoteSession::logout) {
        Some(user) => ActionResponse::success(format!("{user} logged out.")),
        None => ActionResponse::success("No user was logged in."),
    }
}

/// Returns the current user's categories without any network call.
#[flutter_rust_bridge::frb(sync)]
pub fn session_categories() -> SessionResponse {
    let guard = lock_session();
    match guard.as_ref().and_then(RemoteSession::current_user) {
        Some(user) => SessionResponse::from_user(Some(user), "OK."),
        None => SessionResponse::failure("session_categories failed: no user is logged in"),
    }
}

/// Creates a category for the current user.
#[flutter_rust_bridge::frb(sync)]
pub fn session_create_category(name: String) -> ActionResponse {
    with_session("session_create_category", |session| {
        session.create_category(name.trim())
    })
    .map_or_else(ActionResponse::failure, |()| {
        ActionResponse::success("Category created.")
    })
}

/// Appends a note to one of the current user's categories.
#[flutter_rust_bridge::frb(sync)]
pub fn session_add_note(category: String, note: String) -> ActionResponse {
    with_session("session_add_note", |session| {
        session.add_note(category.as_str(), note.as_str())
    })
    .map_or_else(ActionResponse::failure, |()| {
        ActionResponse::success("Note added.")
    })
}

/// Removes the first matching note from one of the current user's categories.
#[flutter_rust_bridge::frb(sync)]
pub fn session_remove_note(category: String, note: String) -> ActionResponse {
    with_session("session_remove_note", |session| {
        session.remove_note(category.as_str(), note.as_str())
    })
    .map_or_else(ActionResponse::failure, |()| {
        ActionResponse::success("Note removed.")
    })
}

/// Serializes the current user for handing to another component.
///
/// Returns `None` when no user is logged in.
#[flutter_rust_bridge::frb(sync)]
pub fn session_export_parcel() -> Option<Vec<u8>> {
    let guard = lock_session();
    guard
        .as_ref()
        .and_then(RemoteSession::current_user)
        .map(|user| user.to_parcel_bytes().to_vec())
}

/// Restores a user serialized by [`session_export_parcel`] without a network call.
#[flutter_rust_bridge::frb(sync)]
pub fn session_restore_parcel(bytes: Vec<u8>) -> SessionResponse {
    let user = match User::from_parcel_bytes(&bytes) {
        Ok(user) => user,
        Err(err) => {
            return SessionResponse::failure(format!("session_restore_parcel failed: {err}"))
        }
    };
    let mut guard = lock_session();
    match ensure_session(&mut guard) {
        Ok(session) => SessionResponse::from_user(Some(session.resume(user)), "Session restored."),
        Err(err) => SessionResponse::failure(format!("session_restore_parcel failed: {err}")),
    }
}

fn lock_session() -> MutexGuard<'static, Option<RemoteSession>> {
    SESSION
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn ensure_session<'a>(
    slot: &'a mut MutexGuard<'static, Option<RemoteSession>>,
) -> Result<&'a mut RemoteSession, String> {
    if slot.is_none() {
        let config = ClientConfig::from_env()?;
        let client = HttpNoteDbClient::new(&config).map_err(|err| err.to_string())?;
        **slot = Some(NoteSession::new(client));
    }
    slot.as_mut()
        .ok_or_else(|| "session unavailable".to_string())
}

fn with_session(
    operation: &str,
    f: impl FnOnce(&mut RemoteSession) -> notesync_core::SessionResult<()>,
) -> Result<(), String> {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return Err(format!("{operation} failed: no user is logged in"));
    };
    f(session).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error op={operation} error={err}");
        format!("{operation} failed: {err}")
    })
}

fn category_views(user: &User) -> Vec<CategoryView> {
    user.category_names()
        .into_iter()
        .filter_map(|name| user.category(name))
        .map(|category| CategoryView {
            name: category.name().to_string(),
            notes: category.notes().to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, session_add_note, session_categories,
        session_export_parcel, session_login, session_logout, session_remove_note,
        session_restore_parcel,
    };
    use notesync_core::{Parcelable, User};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn login_rejects_blank_username_before_any_request() {
        let response = session_login("   ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("username"));
    }

    #[test]
    fn restored_parcel_drives_offline_views() {
        session_logout();
        let response = session_add_note("work".to_string(), "x".to_string());
        assert!(!response.ok);
        assert!(!session_categories().ok);
        assert!(session_export_parcel().is_none());

        let mut user = User::new("alice");
        let work = user.create_category("work").unwrap();
        work.add_note("ship");
        work.add_note("review");
        user.create_category("home").unwrap();

        let restored = session_restore_parcel(user.to_parcel_bytes().to_vec());
        assert!(restored.ok, "{}", restored.message);
        assert_eq!(restored.username.as_deref(), Some("alice"));
        let names = restored
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["home", "work"]);
        assert_eq!(restored.categories[1].notes, vec!["ship", "review"]);

        let missing = session_remove_note("work".to_string(), "absent".to_string());
        assert!(!missing.ok);
        assert!(missing.message.contains("absent"));

        let exported = session_export_parcel().unwrap();
        assert_eq!(User::from_parcel_bytes(&exported).unwrap(), user);

        assert!(!session_restore_parcel(vec![1, 2, 3]).ok);
        session_logout();
    }
}
