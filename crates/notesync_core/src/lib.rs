//! Core domain logic for NoteSync.
//! Users own named categories of notes, synced through a `NoteDbClient`.

pub mod client;
pub mod db;
pub mod logging;
pub mod model;
pub mod parcel;
pub mod queue;
pub mod service;

pub use client::{
    ClientConfig, DbRequestError, DbRequestResult, HttpNoteDbClient, NoteDbClient,
    SqliteNoteDbClient,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::Category;
pub use model::error::{DataError, DataResult};
pub use model::key::{CategoryKey, UserKey};
pub use model::user::User;
pub use parcel::{ParcelError, ParcelReader, ParcelWriter, Parcelable};
pub use queue::{CommandQueue, FlushReport, NoteCommand};
pub use service::loader::spawn_load_user;
pub use service::session::{NoteSession, SessionError, SessionResult};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
