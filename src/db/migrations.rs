//! Opening the contact database and bringing its schema up to date.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info, warn};

const CONTACT_SCHEMA: &str = include_str!("schema.sql");

/// Per-connection settings. `busy_timeout` lets concurrent writers queue
/// instead of failing with SQLITE_BUSY.
const CONNECTION_PRAGMAS: [&str; 3] = [
    "PRAGMA foreign_keys = ON",
    "PRAGMA busy_timeout = 5000",
    "PRAGMA synchronous = NORMAL",
];

/// Open (creating if needed) the contact database at `db_path` and apply the schema.
pub async fn init_db(db_path: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    ensure_parent_dir(Path::new(db_path))?;

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .after_connect(|conn, _meta| Box::pin(async move { prepare_connection(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    let applied = run_migrations(&pool).await?;
    info!(path = %db_path, max_connections, statements = applied, "Contact database ready");
    Ok(pool)
}

fn ensure_parent_dir(db_path: &Path) -> Result<(), sqlx::Error> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)
        }
        _ => Ok(()),
    }
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    CONTACT_SCHEMA
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
}

/// Apply the contact schema. Every statement is `IF NOT EXISTS`, so reruns are no-ops.
async fn run_migrations(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let mut applied = 0;
    for statement in schema_statements() {
        sqlx::query(statement).execute(pool).await?;
        applied += 1;
    }
    Ok(applied)
}

async fn prepare_connection(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for pragma in CONNECTION_PRAGMAS {
        sqlx::query(pragma).execute(&mut *conn).await?;
    }

    let journal_mode: String = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?
        .try_get(0)?;
    if journal_mode.eq_ignore_ascii_case("wal") {
        debug!("Contact database connection opened in WAL mode");
    } else {
        warn!(journal_mode = %journal_mode, "WAL unavailable; falling back");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db_path(temp_dir: &TempDir) -> String {
        temp_dir
            .path()
            .join("contacts.db")
            .to_string_lossy()
            .to_string()
    }

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_db_path(&temp_dir);

        let pool = init_db(&db_path, 2).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());

        let result: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_init_db_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("nested/dir/contacts.db")
            .to_string_lossy()
            .to_string();

        init_db(&db_path, 1).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());
    }

    #[tokio::test]
    async fn test_migrations_create_contact_table() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_db_path(&temp_dir), 2)
            .await
            .expect("init_db failed");

        let result: (String,) = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='contact'",
        )
        .fetch_one(&pool)
        .await
        .expect("query failed");
        assert_eq!(result.0, "contact");

        let columns: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('contact')")
            .fetch_all(&pool)
            .await
            .expect("query failed");
        let columns: Vec<String> = columns.into_iter().map(|c| c.0).collect();
        assert_eq!(columns, crate::domain::CONTACT_FIELDS);
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_db_path(&temp_dir), 2)
            .await
            .expect("init_db failed");

        let applied = run_migrations(&pool)
            .await
            .expect("second migration run failed");
        assert_eq!(applied, 1);

        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='contact'")
                .fetch_one(&pool)
                .await
                .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[test]
    fn test_schema_statements_skip_blanks() {
        let statements: Vec<&str> = schema_statements().collect();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS contact"));
    }

    #[tokio::test]
    async fn test_pragmas_configured() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_db_path(&temp_dir), 2)
            .await
            .expect("init_db failed");

        let result: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);

        let result: (i64,) = sqlx::query_as("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 5000);

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        // WAL is best-effort; SQLite can fall back depending on the filesystem.
        assert!(
            matches!(result.0.as_str(), "wal" | "delete"),
            "unexpected journal_mode: {}",
            result.0
        );
    }
}
