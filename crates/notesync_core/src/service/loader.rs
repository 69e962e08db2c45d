//! Background user loading.
//!
//! Runs `get_user` off the caller's thread and hands the result to a
//! callback. There is no cancellation and no ordering between loads.

use crate::client::{DbRequestResult, NoteDbClient};
use crate::model::key::UserKey;
use crate::model::user::User;
use log::debug;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Spawns a thread that fetches `key` and passes the outcome to `on_done`.
pub fn spawn_load_user<C, F>(client: Arc<C>, key: UserKey, on_done: F) -> JoinHandle<()>
where
    C: NoteDbClient + Send + Sync + 'static,
    F: FnOnce(DbRequestResult<Option<User>>) + Send + 'static,
{
    std::thread::spawn(move || {
        debug!(
            "event=user_load module=service status=start user={}",
            key.name
        );
        let result = client.get_user(&key);
        debug!(
            "event=user_load module=service status={} user={}",
            if result.is_ok() { "ok" } else { "error" },
            key.name
        );
        on_done(result);
    })
}
