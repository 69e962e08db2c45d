//! Value keys for users and categories.
//!
//! # Responsibility
//! - Address users and categories by value for map lookups and remote calls.
//!
//! # Invariants
//! - Equality and hashing are by value: two keys built from the same owner
//!   and name are interchangeable in any hash map.

use crate::model::error::{DataError, DataResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lookup key for one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserKey {
    pub name: String,
}

impl UserKey {
    /// Builds a key without validation.
    ///
    /// Used for identifiers that already passed through [`UserKey::parse`]
    /// or come from trusted storage.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validates raw login input and builds a key from the trimmed value.
    ///
    /// # Errors
    /// - Returns [`DataError::EmptyUsername`] for empty or whitespace-only input.
    pub fn parse(raw: &str) -> DataResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DataError::EmptyUsername);
        }
        Ok(Self::new(trimmed))
    }

    /// Builds a key for one of this user's categories.
    pub fn category(&self, name: impl Into<String>) -> CategoryKey {
        CategoryKey::new(self.clone(), name)
    }
}

impl Display for UserKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lookup key for one category, scoped by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryKey {
    pub owner: UserKey,
    pub name: String,
}

impl CategoryKey {
    pub fn new(owner: UserKey, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner.name, self.name)
    }
}
