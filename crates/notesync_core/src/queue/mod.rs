//! Pending note commands for offline use.
//!
//! # Responsibility
//! - Buffer mutations issued while the remote service is unreachable.
//! - Replay them in FIFO order when the caller decides to flush.
//!
//! # Invariants
//! - Flush stops at the first failing command; that command and everything
//!   after it stay queued in the original order.
//! - Flush never retries on its own.

use crate::client::{DbRequestResult, NoteDbClient};
use crate::model::key::CategoryKey;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One deferred client mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NoteCommand {
    AddNote { key: CategoryKey, note: String },
    RemoveNote { key: CategoryKey, note: String },
    CreateCategory { key: CategoryKey },
}

impl NoteCommand {
    /// Runs this command against `client`.
    pub fn execute<C: NoteDbClient + ?Sized>(&self, client: &C) -> DbRequestResult<()> {
        match self {
            Self::AddNote { key, note } => client.add_note(key, note),
            Self::RemoveNote { key, note } => client.remove_note(key, note),
            Self::CreateCategory { key } => client.create_category(key),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::AddNote { .. } => "add_note",
            Self::RemoveNote { .. } => "remove_note",
            Self::CreateCategory { .. } => "create_category",
        }
    }
}

/// Outcome of one [`CommandQueue::flush`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Commands executed successfully and removed from the queue.
    pub executed: usize,
    /// Error message of the command that stopped the flush.
    pub failure: Option<String>,
}

impl FlushReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// FIFO queue of pending commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandQueue {
    commands: VecDeque<NoteCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: NoteCommand) {
        self.commands.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &NoteCommand> {
        self.commands.iter()
    }

    /// Executes pending commands in order until one fails.
    pub fn flush<C: NoteDbClient + ?Sized>(&mut self, client: &C) -> FlushReport {
        let mut report = FlushReport::default();

        while let Some(command) = self.commands.front() {
            if let Err(err) = command.execute(client) {
                warn!(
                    "event=queue_flush module=queue status=error op={} executed={} remaining={} error={}",
                    command.label(),
                    report.executed,
                    self.commands.len(),
                    err
                );
                report.failure = Some(err.to_string());
                return report;
            }
            self.commands.pop_front();
            report.executed += 1;
        }

        info!(
            "event=queue_flush module=queue status=ok executed={}",
            report.executed
        );
        report
    }
}
