//! User domain model.
//!
//! # Responsibility
//! - Own the user's categories keyed by category name.
//! - Enforce per-user category name uniqueness.
//!
//! # Invariants
//! - Every stored category has `owner == self.key()`.
//! - Map keys always equal the stored category's `name()`.
//! - Lookups borrow `&str` and never allocate a key.

use crate::model::category::Category;
use crate::model::error::{DataError, DataResult};
use crate::model::key::UserKey;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// An application user and the categories they own.
#[derive(Debug, Clone)]
pub struct User {
    key: UserKey,
    categories: HashMap<String, Category>,
}

impl User {
    /// Creates a user with no categories.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::from_key(UserKey::new(identifier))
    }

    pub fn from_key(key: UserKey) -> Self {
        Self {
            key,
            categories: HashMap::new(),
        }
    }

    /// Unique user identifier.
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn key(&self) -> &UserKey {
        &self.key
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Iterates categories in unspecified order.
    pub fn categories(&self) -> impl ExactSizeIterator<Item = &Category> {
        self.categories.values()
    }

    /// Category names sorted for stable presentation.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names = self
            .categories
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Creates a new empty category.
    ///
    /// # Errors
    /// - [`DataError::EmptyCategoryName`] when `name` is blank.
    /// - [`DataError::CategoryAlreadyExists`] when `name` is taken.
    pub fn create_category(&mut self, name: &str) -> DataResult<&mut Category> {
        if name.trim().is_empty() {
            return Err(DataError::EmptyCategoryName);
        }
        match self.categories.entry(name.to_string()) {
            Entry::Occupied(_) => Err(DataError::CategoryAlreadyExists(name.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(Category::new(self.key.clone(), name))),
        }
    }

    /// Inserts a fully built category, replacing any same-named one.
    ///
    /// Returns the replaced category when one existed.
    ///
    /// # Errors
    /// - [`DataError::ForeignCategory`] when the category has another owner.
    pub fn insert_category(&mut self, category: Category) -> DataResult<Option<Category>> {
        if category.owner() != &self.key {
            return Err(DataError::ForeignCategory {
                owner: category.owner().name.clone(),
                category: category.name().to_string(),
            });
        }
        Ok(self
            .categories
            .insert(category.name().to_string(), category))
    }

    /// Removes a category and returns it when present.
    pub fn destroy_category(&mut self, name: &str) -> Option<Category> {
        self.categories.remove(name)
    }

    /// Renames one category, keeping its notes.
    ///
    /// Renaming to the current name is a no-op.
    ///
    /// # Errors
    /// - [`DataError::CategoryNotFound`] when `old_name` is missing.
    /// - [`DataError::EmptyCategoryName`] when `new_name` is blank.
    /// - [`DataError::CategoryAlreadyExists`] when `new_name` is taken.
    pub fn rename_category(&mut self, old_name: &str, new_name: &str) -> DataResult<()> {
        if !self.categories.contains_key(old_name) {
            return Err(DataError::CategoryNotFound(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if new_name.trim().is_empty() {
            return Err(DataError::EmptyCategoryName);
        }
        if self.categories.contains_key(new_name) {
            return Err(DataError::CategoryAlreadyExists(new_name.to_string()));
        }

        let Some(mut category) = self.categories.remove(old_name) else {
            return Err(DataError::CategoryNotFound(old_name.to_string()));
        };
        category.set_name(new_name.to_string());
        self.categories.insert(new_name.to_string(), category);
        Ok(())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "User {}", self.key.name)
    }
}
