//! Flutter-facing bindings for the NoteSync mobile shell.

pub mod api;
