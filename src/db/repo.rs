//! SQLite-backed contact store.

use crate::domain::{
    format_timestamp, ContactId, ContactInsert, ContactRecord, ContactUpdate, Field, RawContactRow,
};
use crate::error::ContactError;
use crate::store::ContactStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info, warn};

const SELECT_CONTACT: &str = r#"
    SELECT id, first_name, last_name, email, phone, created_at, updated_at
    FROM contact
    WHERE id = ?
"#;

/// Repository for contact rows in SQLite.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Pull the contact columns out of a row without judging them.
///
/// Decode failures are reported against the offending column.
fn raw_row(row: &SqliteRow) -> Result<RawContactRow, ContactError> {
    fn column<T>(row: &SqliteRow, name: &str) -> Result<Option<T>, ContactError>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        row.try_get::<Option<T>, _>(name)
            .map_err(|e| ContactError::schema_violation(name, e.to_string()))
    }

    Ok(RawContactRow {
        id: column(row, "id")?,
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        email: column(row, "email")?,
        phone: column(row, "phone")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn to_record(row: &SqliteRow) -> Result<ContactRecord, ContactError> {
    raw_row(row)
        .and_then(ContactRecord::try_from)
        .map_err(|e| {
            warn!(error = %e, "Stored contact row failed validation");
            e
        })
}

fn map_insert_error(err: sqlx::Error, requested: Option<ContactId>) -> ContactError {
    match (&err, requested) {
        (sqlx::Error::Database(db_err), Some(id)) if db_err.is_unique_violation() => {
            ContactError::Conflict(id)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl ContactStore for Repository {
    async fn insert(&self, contact: ContactInsert) -> Result<ContactRecord, ContactError> {
        let created_at = contact.created_at.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"
            INSERT INTO contact (id, first_name, last_name, email, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(contact.id.map(|id| id.as_i64()))
        .bind(contact.first_name.as_str())
        .bind(contact.last_name.as_str())
        .bind(contact.email.as_str())
        .bind(contact.phone.as_deref())
        .bind(format_timestamp(created_at))
        .bind(contact.updated_at.map(format_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, contact.id))?;

        let id = ContactId::new(result.last_insert_rowid());
        info!(contact_id = %id, "Contact created");

        self.read(id).await
    }

    async fn update(
        &self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord, ContactError> {
        update.ensure_target(id)?;

        let ContactUpdate {
            first_name,
            last_name,
            email,
            phone,
            created_at,
            updated_at,
            ..
        } = update;

        let phone_touched = !phone.is_absent();
        let created_at_touched = !created_at.is_absent();
        let updated_at = match updated_at {
            Field::Absent => Some(Utc::now()),
            other => other.into_option(),
        };

        // Single statement: the write lock is held before the row is read.
        let row = sqlx::query(
            r#"
            UPDATE contact
            SET first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                email = COALESCE(?, email),
                phone = CASE WHEN ? THEN ? ELSE phone END,
                created_at = CASE WHEN ? THEN ? ELSE created_at END,
                updated_at = ?
            WHERE id = ?
            RETURNING id, first_name, last_name, email, phone, created_at, updated_at
            "#,
        )
        .bind(first_name.as_deref())
        .bind(last_name.as_deref())
        .bind(email.as_deref())
        .bind(phone_touched)
        .bind(phone.into_option())
        .bind(created_at_touched)
        .bind(created_at.into_option().map(format_timestamp))
        .bind(updated_at.map(format_timestamp))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ContactError::NotFound(id))?;
        let record = to_record(&row)?;

        info!(contact_id = %id, "Contact updated");
        Ok(record)
    }

    async fn read(&self, id: ContactId) -> Result<ContactRecord, ContactError> {
        debug!(contact_id = %id, "Reading contact");

        let row = sqlx::query(SELECT_CONTACT)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContactError::NotFound(id))?;

        to_record(&row)
    }

    async fn ping(&self) -> Result<(), ContactError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
