//! Domain model for users, categories and their lookup keys.
//!
//! # Responsibility
//! - Define the user-owned category/note shape shared by clients and services.
//! - Provide value keys used to address users and categories without cloning
//!   full domain objects.
//!
//! # Invariants
//! - Category names are unique within one user.
//! - User identifiers are unique across the remote service.
//! - Duplicate notes inside one category are allowed.

pub mod category;
pub mod error;
pub mod key;
pub mod user;
