//! Update payload: a partial change to an existing contact.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::contact::CONTACT_FIELDS;
use crate::domain::field::{as_object, lookup, reject_unknown, Field, FieldIssue};
use crate::domain::{ContactId, ContactRecord};
use crate::error::ContactError;

/// A validated update payload. Every field is optional.
///
/// Non-nullable columns use `Option`: `None` leaves the column unchanged.
/// Nullable columns use `Field` so that "omit" and "set to null" stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    /// Must equal the target id when present.
    pub id: Option<ContactId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Field<String>,
    pub created_at: Field<DateTime<Utc>>,
    pub updated_at: Field<DateTime<Utc>>,
}

impl ContactUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone number; `None` clears it.
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Validate an untyped update payload.
    ///
    /// Any subset of fields is accepted, including `{}`.
    ///
    /// # Errors
    /// Returns `ContactError::Validation` when a non-nullable field carries
    /// `null`, a field has the wrong type, or an unknown key is present.
    pub fn from_json(value: &Value) -> Result<Self, ContactError> {
        let obj = as_object(value).map_err(FieldIssue::into_validation)?;
        reject_unknown(obj, &CONTACT_FIELDS).map_err(FieldIssue::into_validation)?;

        let field = |name: &str| lookup::<String>(obj, name).map_err(FieldIssue::into_validation);
        let stamp = |name: &str| {
            lookup::<DateTime<Utc>>(obj, name).map_err(FieldIssue::into_validation)
        };

        Ok(ContactUpdate {
            id: lookup::<i64>(obj, "id")
                .map_err(FieldIssue::into_validation)?
                .non_null("id")?
                .map(ContactId::new),
            first_name: field("first_name")?.non_null("first_name")?,
            last_name: field("last_name")?.non_null("last_name")?,
            email: field("email")?.non_null("email")?,
            phone: field("phone")?,
            created_at: stamp("created_at")?,
            updated_at: stamp("updated_at")?,
        })
    }

    /// True when the update touches no field at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_absent()
            && self.created_at.is_absent()
            && self.updated_at.is_absent()
    }

    /// True when the payload decides `updated_at` itself.
    pub fn sets_updated_at(&self) -> bool {
        !self.updated_at.is_absent()
    }

    /// Check that a payload `id`, if any, names the record being updated.
    pub fn ensure_target(&self, target: ContactId) -> Result<(), ContactError> {
        match self.id {
            Some(id) if id != target => Err(ContactError::validation(
                "id",
                format!("is immutable (record {} cannot become {})", target, id),
            )),
            _ => Ok(()),
        }
    }

    /// Merge the touched fields into `record`.
    ///
    /// # Errors
    /// Returns `ContactError::Validation` if the payload tries to change the id.
    /// `record` is left untouched in that case.
    pub fn apply_to(self, record: &mut ContactRecord) -> Result<(), ContactError> {
        self.ensure_target(record.id)?;

        if let Some(first_name) = self.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        self.phone.apply(&mut record.phone);
        self.created_at.apply(&mut record.created_at);
        self.updated_at.apply(&mut record.updated_at);

        Ok(())
    }
}
