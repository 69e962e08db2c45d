//! Tagged binary serialization for handing users and categories between
//! components.
//!
//! # Responsibility
//! - Encode/decode domain objects into a compact, self-describing layout.
//! - Reject payloads whose class tag does not match the expected type.
//!
//! # Invariants
//! - Every object starts with its class-tag string.
//! - Strings are `u32` little-endian byte length followed by UTF-8 bytes.
//! - Collections are `u32` little-endian count followed by the elements.

mod codec;
mod domain;

pub use codec::{ParcelError, ParcelReader, ParcelResult, ParcelWriter, Parcelable};
pub use domain::{CATEGORY_TAG, USER_TAG};
