//! Use-case services on top of note clients.
//!
//! # Responsibility
//! - Keep the logged-in user's state in step with the storage client.
//! - Offer background loading for callers that must not block.

pub mod loader;
pub mod session;
