//! The persisted contact row and its boundary check.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::field::{as_object, lookup, Field, FieldIssue};
use crate::domain::primitives::parse_timestamp;
use crate::domain::ContactId;
use crate::error::ContactError;

/// Column names of the `contact` table, in declaration order.
pub const CONTACT_FIELDS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "created_at",
    "updated_at",
];

/// One stored contact (the Row shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Assigned by the store, immutable afterwards.
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Set once at creation.
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed on every update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A contact row as handed back by storage, before any shape checks.
///
/// Every column is nullable here; `ContactRecord::try_from` enforces the Row
/// invariants and reports breaches as `SchemaViolation`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContactRow {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl TryFrom<RawContactRow> for ContactRecord {
    type Error = ContactError;

    fn try_from(raw: RawContactRow) -> Result<Self, Self::Error> {
        Ok(ContactRecord {
            id: ContactId::new(not_null(raw.id, "id")?),
            first_name: not_null(raw.first_name, "first_name")?,
            last_name: not_null(raw.last_name, "last_name")?,
            email: not_null(raw.email, "email")?,
            phone: raw.phone,
            created_at: timestamp(raw.created_at, "created_at")?,
            updated_at: timestamp(raw.updated_at, "updated_at")?,
        })
    }
}

impl ContactRecord {
    /// Validate a record retrieved as JSON against the Row shape.
    ///
    /// Every column key must be present; nullable columns may carry `null`.
    /// Keys outside the Row shape are ignored so that a wider `SELECT` does not
    /// break reads.
    pub fn from_json(value: &Value) -> Result<Self, ContactError> {
        let obj = as_object(value).map_err(FieldIssue::into_schema_violation)?;

        let raw = RawContactRow {
            id: row_field(obj, "id")?,
            first_name: row_field(obj, "first_name")?,
            last_name: row_field(obj, "last_name")?,
            email: row_field(obj, "email")?,
            phone: row_field(obj, "phone")?,
            created_at: row_field(obj, "created_at")?,
            updated_at: row_field(obj, "updated_at")?,
        };

        ContactRecord::try_from(raw)
    }

    /// Shape check only: returns `Ok(())` when `value` is a valid Row.
    pub fn validate_json(value: &Value) -> Result<(), ContactError> {
        Self::from_json(value).map(|_| ())
    }
}

fn row_field<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Option<T>, ContactError> {
    match lookup::<T>(obj, name).map_err(FieldIssue::into_schema_violation)? {
        Field::Absent => Err(ContactError::schema_violation(name, "is missing")),
        Field::Null => Ok(None),
        Field::Value(v) => Ok(Some(v)),
    }
}

fn not_null<T>(value: Option<T>, name: &str) -> Result<T, ContactError> {
    value.ok_or_else(|| ContactError::schema_violation(name, "must not be null"))
}

fn timestamp(value: Option<String>, name: &str) -> Result<Option<DateTime<Utc>>, ContactError> {
    value
        .map(|s| {
            parse_timestamp(&s).map_err(|e| {
                ContactError::schema_violation(name, format!("invalid timestamp {:?}: {}", s, e))
            })
        })
        .transpose()
}
