//! Domain rule violations raised by model operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DataResult<T> = Result<T, DataError>;

/// Model-level error for user/category mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Username was empty after trimming.
    EmptyUsername,
    /// Category name was empty after trimming.
    EmptyCategoryName,
    /// Target category name is already used by the same user.
    CategoryAlreadyExists(String),
    /// Category does not exist for the user.
    CategoryNotFound(String),
    /// Note does not exist in the category.
    NoteNotFound { category: String, note: String },
    /// Category belongs to a different user than the one receiving it.
    ForeignCategory { owner: String, category: String },
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::EmptyCategoryName => write!(f, "category name cannot be empty"),
            Self::CategoryAlreadyExists(name) => write!(f, "category already exists: `{name}`"),
            Self::CategoryNotFound(name) => write!(f, "category not found: `{name}`"),
            Self::NoteNotFound { category, note } => {
                write!(f, "note `{note}` not found in category `{category}`")
            }
            Self::ForeignCategory { owner, category } => {
                write!(f, "category `{category}` is owned by another user `{owner}`")
            }
        }
    }
}

impl Error for DataError {}
