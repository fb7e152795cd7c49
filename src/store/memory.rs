//! In-memory contact store for tests and embedding.

use super::ContactStore;
use crate::domain::{ContactId, ContactInsert, ContactRecord, ContactUpdate};
use crate::error::ContactError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct State {
    next_id: i64,
    rows: BTreeMap<ContactId, ContactRecord>,
}

/// Contact store backed by a `BTreeMap` behind a tokio `RwLock`.
///
/// Ids are assigned like SQLite `AUTOINCREMENT`: one past the largest id ever
/// stored.
#[derive(Debug)]
pub struct MemoryContactStore {
    state: RwLock<State>,
}

impl MemoryContactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored contacts.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn insert(&self, contact: ContactInsert) -> Result<ContactRecord, ContactError> {
        let mut state = self.state.write().await;

        let id = match contact.id {
            Some(id) if state.rows.contains_key(&id) => return Err(ContactError::Conflict(id)),
            Some(id) => id,
            // next_id is pinned at i64::MAX once that id is used
            None if state.rows.contains_key(&ContactId::new(state.next_id)) => {
                return Err(ContactError::Storage("contact id space exhausted".to_string()))
            }
            None => ContactId::new(state.next_id),
        };
        state.next_id = state.next_id.max(id.as_i64().saturating_add(1));

        let record = ContactRecord {
            id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            created_at: Some(contact.created_at.unwrap_or_else(Utc::now)),
            updated_at: contact.updated_at,
        };
        state.rows.insert(id, record.clone());

        debug!(contact_id = %id, "Inserted contact into memory store");
        Ok(record)
    }

    async fn update(
        &self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord, ContactError> {
        let mut state = self.state.write().await;
        let stored = state.rows.get_mut(&id).ok_or(ContactError::NotFound(id))?;

        let mut record = stored.clone();
        let refresh = !update.sets_updated_at();
        update.apply_to(&mut record)?;
        if refresh {
            record.updated_at = Some(Utc::now());
        }
        *stored = record.clone();

        debug!(contact_id = %id, "Updated contact in memory store");
        Ok(record)
    }

    async fn read(&self, id: ContactId) -> Result<ContactRecord, ContactError> {
        self.state
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(ContactError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryContactStore::new();
        let a = store
            .insert(ContactInsert::new("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();
        let b = store
            .insert(ContactInsert::new("Grace", "Hopper", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(a.id, ContactId::new(1));
        assert_eq!(b.id, ContactId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_counter() {
        let store = MemoryContactStore::new();
        store
            .insert(ContactInsert::new("Ada", "Lovelace", "ada@example.com").with_id(ContactId::new(10)))
            .await
            .unwrap();
        let next = store
            .insert(ContactInsert::new("Grace", "Hopper", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(next.id, ContactId::new(11));
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = MemoryContactStore::new();
        let insert = ContactInsert::new("Ada", "Lovelace", "ada@example.com").with_id(ContactId::new(5));
        store.insert(insert.clone()).await.unwrap();
        assert!(matches!(
            store.insert(insert).await,
            Err(ContactError::Conflict(id)) if id == ContactId::new(5)
        ));
    }

    #[tokio::test]
    async fn test_auto_id_after_max_id_does_not_overwrite() {
        let store = MemoryContactStore::new();
        store
            .insert(
                ContactInsert::new("Ada", "Lovelace", "ada@example.com")
                    .with_id(ContactId::new(i64::MAX)),
            )
            .await
            .unwrap();

        let result = store
            .insert(ContactInsert::new("Grace", "Hopper", "grace@example.com"))
            .await;
        assert!(matches!(result, Err(ContactError::Storage(_))));

        assert_eq!(store.len().await, 1);
        let kept = store.read(ContactId::new(i64::MAX)).await.unwrap();
        assert_eq!(kept.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_auto_id_skips_explicitly_taken_id() {
        let store = MemoryContactStore::new();
        store
            .insert(ContactInsert::new("Ada", "Lovelace", "ada@example.com").with_id(ContactId::new(1)))
            .await
            .unwrap();
        let next = store
            .insert(ContactInsert::new("Grace", "Hopper", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(next.id, ContactId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_supplied_created_at_is_kept() {
        let store = MemoryContactStore::new();
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let record = store
            .insert(ContactInsert::new("Ada", "Lovelace", "ada@example.com").with_created_at(ts))
            .await
            .unwrap();
        assert_eq!(record.created_at, Some(ts));
        assert_eq!(record.updated_at, None);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record() {
        let store = MemoryContactStore::new();
        let record = store
            .insert(ContactInsert::new("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();

        let mut update = ContactUpdate::new().email("other@example.com");
        update.id = Some(ContactId::new(99));
        assert!(store.update(record.id, update).await.is_err());

        assert_eq!(store.read(record.id).await.unwrap(), record);
    }
}
