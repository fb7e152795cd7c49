//! Storage collaborator abstraction for contact records.

use crate::domain::{ContactId, ContactInsert, ContactRecord, ContactUpdate};
use crate::error::ContactError;
use async_trait::async_trait;
use std::fmt;

pub mod memory;

pub use memory::MemoryContactStore;

/// Storage collaborator owning persistence, id assignment and write ordering.
///
/// Every record an implementation returns must satisfy the Row invariants.
#[async_trait]
pub trait ContactStore: Send + Sync + fmt::Debug {
    /// Create a contact.
    ///
    /// A missing `id` is assigned by the store and a missing `created_at`
    /// defaults to now. `updated_at` stays null unless supplied.
    ///
    /// # Errors
    /// `Conflict` if the requested id is already taken.
    async fn insert(&self, contact: ContactInsert) -> Result<ContactRecord, ContactError>;

    /// Apply a partial update to an existing contact.
    ///
    /// `updated_at` is refreshed to now unless the payload sets it, even when
    /// the payload is otherwise empty.
    ///
    /// # Errors
    /// `NotFound` if `id` does not exist, `Validation` if the payload tries to
    /// change the id.
    async fn update(
        &self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord, ContactError>;

    /// Fetch a contact by id.
    ///
    /// # Errors
    /// `NotFound` if `id` does not exist, `SchemaViolation` if the stored row
    /// breaks the Row shape.
    async fn read(&self, id: ContactId) -> Result<ContactRecord, ContactError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), ContactError> {
        Ok(())
    }
}
