//! Payload field presence and JSON object access helpers.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ContactError;

/// A payload field that keeps "omitted" apart from an explicit `null`.
///
/// Omission means "leave unchanged"; `Null` means "clear" and is only legal
/// on nullable columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Null,
        }
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Collapse to an `Option`, treating omission and `null` alike.
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Absent | Field::Null => None,
        }
    }

    /// Require a present, non-null value.
    pub fn require(self, name: &str) -> Result<T, ContactError> {
        match self {
            Field::Value(v) => Ok(v),
            Field::Absent => Err(ContactError::validation(name, "is required")),
            Field::Null => Err(ContactError::validation(name, "must not be null")),
        }
    }

    /// Allow omission but reject an explicit `null`.
    pub fn non_null(self, name: &str) -> Result<Option<T>, ContactError> {
        match self {
            Field::Value(v) => Ok(Some(v)),
            Field::Absent => Ok(None),
            Field::Null => Err(ContactError::validation(name, "must not be null")),
        }
    }

    /// Write this field into a nullable slot; `Absent` leaves the slot untouched.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Field::Absent => {}
            Field::Null => *slot = None,
            Field::Value(v) => *slot = Some(v),
        }
    }
}

/// A problem with a single JSON field, not yet classified as payload or row error.
#[derive(Debug)]
pub(crate) struct FieldIssue {
    field: String,
    reason: String,
}

impl FieldIssue {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn into_validation(self) -> ContactError {
        ContactError::validation(self.field, self.reason)
    }

    pub(crate) fn into_schema_violation(self) -> ContactError {
        ContactError::schema_violation(self.field, self.reason)
    }
}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>, FieldIssue> {
    value
        .as_object()
        .ok_or_else(|| FieldIssue::new("$", "expected a JSON object"))
}

pub(crate) fn reject_unknown(obj: &Map<String, Value>, allowed: &[&str]) -> Result<(), FieldIssue> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(unknown) => Err(FieldIssue::new(unknown.as_str(), "is not a contact field")),
        None => Ok(()),
    }
}

pub(crate) fn lookup<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Field<T>, FieldIssue> {
    match obj.get(name) {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(Field::Null),
        Some(v) => serde_json::from_value(v.clone())
            .map(Field::Value)
            .map_err(|e| FieldIssue::new(name, e.to_string())),
    }
}
