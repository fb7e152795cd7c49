//! Contact record schema.
//!
//! This module provides:
//! - `ContactRecord`, the persisted Row shape, and its boundary check
//! - `ContactInsert` and `ContactUpdate` payload shapes with JSON validation
//! - `Field`, the omitted / null / value tri-state used by update payloads

pub mod contact;
pub mod field;
pub mod insert;
pub mod primitives;
pub mod update;

pub use contact::{ContactRecord, RawContactRow, CONTACT_FIELDS};
pub use field::Field;
pub use insert::ContactInsert;
pub use primitives::{format_timestamp, parse_timestamp, ContactId};
pub use update::ContactUpdate;
