//! Category domain model.
//!
//! # Responsibility
//! - Hold one named, ordered list of notes owned by exactly one user.
//!
//! # Invariants
//! - `owner` never changes after construction.
//! - Notes keep insertion order; duplicates are allowed.

use crate::model::key::{CategoryKey, UserKey};
use std::hash::{Hash, Hasher};

/// A named list of notes owned by a user.
#[derive(Debug, Clone)]
pub struct Category {
    owner: UserKey,
    name: String,
    notes: Vec<String>,
}

impl Category {
    /// Creates an empty category.
    pub fn new(owner: UserKey, name: impl Into<String>) -> Self {
        Self::with_notes(owner, name, Vec::new())
    }

    /// Creates a category pre-filled with notes, e.g. from a remote fetch.
    pub fn with_notes(owner: UserKey, name: impl Into<String>, notes: Vec<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            notes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &UserKey {
        &self.owner
    }

    pub fn key(&self) -> CategoryKey {
        CategoryKey::new(self.owner.clone(), self.name.clone())
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Appends one note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Inserts one note at `index`, clamped to the current length.
    pub fn insert_note(&mut self, index: usize, note: impl Into<String>) {
        let index = index.min(self.notes.len());
        self.notes.insert(index, note.into());
    }

    /// Removes the first occurrence of `note`.
    ///
    /// Returns the removed position, or `None` when the note is absent.
    pub fn remove_note(&mut self, note: &str) -> Option<usize> {
        let position = self.notes.iter().position(|value| value == note)?;
        self.notes.remove(position);
        Some(position)
    }

    /// Removes the note at `index` when it exists.
    pub fn remove_note_at(&mut self, index: usize) -> Option<String> {
        (index < self.notes.len()).then(|| self.notes.remove(index))
    }

    pub fn contains_note(&self, note: &str) -> bool {
        self.notes.iter().any(|value| value == note)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.name.hash(state);
    }
}
