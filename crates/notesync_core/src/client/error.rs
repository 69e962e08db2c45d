//! The single error kind surfaced by storage clients.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DbRequestResult<T> = Result<T, DbRequestError>;

/// Wrapped failure of one client operation.
///
/// Each variant records the operation name (`get_user`, `add_note`, ...) and
/// the underlying cause. Callers match on the type, not on the cause.
#[derive(Debug)]
pub enum DbRequestError {
    /// Request could not be built, sent, or its body could not be read.
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },
    /// Response body was not the expected JSON shape.
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },
    /// Local cache access failed.
    Storage {
        operation: &'static str,
        source: DbError,
    },
}

impl DbRequestError {
    pub fn transport(operation: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }

    pub fn decode(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { operation, source }
    }

    pub fn storage(operation: &'static str, source: impl Into<DbError>) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }

    /// Name of the failed client operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Storage { operation, .. } => operation,
        }
    }
}

impl Display for DbRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { operation, source } => {
                write!(f, "db request `{operation}` failed: transport error: {source}")
            }
            Self::Decode { operation, source } => {
                write!(f, "db request `{operation}` failed: malformed response: {source}")
            }
            Self::Storage { operation, source } => {
                write!(f, "db request `{operation}` failed: storage error: {source}")
            }
        }
    }
}

impl Error for DbRequestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Storage { source, .. } => Some(source),
        }
    }
}
