//! Insert payload: the shape required to create a contact.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::contact::CONTACT_FIELDS;
use crate::domain::field::{as_object, lookup, reject_unknown, FieldIssue};
use crate::domain::ContactId;
use crate::error::ContactError;

/// A validated insert payload.
///
/// `first_name`, `last_name` and `email` are required. Everything else may be
/// left to the store: a missing `id` is auto-assigned and a missing
/// `created_at` defaults to the insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactInsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContactInsert {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        ContactInsert {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Request a specific id instead of letting the store assign one.
    pub fn with_id(mut self, id: ContactId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Validate an untyped insert payload.
    ///
    /// # Errors
    /// Returns `ContactError::Validation` when a required field is missing or
    /// null, `id` is null, a field has the wrong type, or an unknown key is
    /// present.
    pub fn from_json(value: &Value) -> Result<Self, ContactError> {
        let obj = as_object(value).map_err(FieldIssue::into_validation)?;
        reject_unknown(obj, &CONTACT_FIELDS).map_err(FieldIssue::into_validation)?;

        let field = |name: &str| lookup::<String>(obj, name).map_err(FieldIssue::into_validation);
        let stamp = |name: &str| {
            lookup::<DateTime<Utc>>(obj, name).map_err(FieldIssue::into_validation)
        };

        Ok(ContactInsert {
            id: lookup::<i64>(obj, "id")
                .map_err(FieldIssue::into_validation)?
                .non_null("id")?
                .map(ContactId::new),
            first_name: field("first_name")?.require("first_name")?,
            last_name: field("last_name")?.require("last_name")?,
            email: field("email")?.require("email")?,
            phone: field("phone")?.into_option(),
            created_at: stamp("created_at")?.into_option(),
            updated_at: stamp("updated_at")?.into_option(),
        })
    }
}
