//! Startup bootstrap for the `users` schema.
//!
//! Every step is idempotent, so the initializer runs on each process start.

use sqlx::{Connection, PgConnection};

use crate::config::{DatabaseConfig, DB_DATABASE_VAR, DB_URI_VAR, POSTGRES_URI_VAR};
use crate::error::{is_unique_violation_on, map_sqlx_error, Result};
use crate::store::postgres::{release, PgConnectionProvider};

/// SQLSTATEs for an object that already exists.
const DUPLICATE_DATABASE: &str = "42P04";
const DUPLICATE_TABLE: &str = "42P07";

/// Catalog indexes hit with a unique violation when two sessions create the
/// same database or table at once.
const DATABASE_NAME_INDEX: &str = "pg_database_datname_index";
const TABLE_NAME_INDEXES: [&str; 2] = ["pg_type_typname_nsp_index", "pg_class_relname_nsp_index"];

const BANNER: &str = "============================================================";

pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Ensures the target database and the `users` table exist.
///
/// Failures are logged with the step they happened in and returned; callers
/// must not start serving when this returns an error.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<()> {
    tracing::info!("{}", BANNER);
    tracing::info!("Starting database initialization...");
    tracing::info!("{}", BANNER);

    match run_steps(config).await {
        Ok(()) => {
            tracing::info!("{}", BANNER);
            tracing::info!("Database initialization completed successfully");
            tracing::info!("{}", BANNER);
            Ok(())
        }
        Err(err) => {
            tracing::error!("{}", BANNER);
            tracing::error!("Database initialization failed: {}", err);
            tracing::error!("{}", BANNER);
            Err(err)
        }
    }
}

async fn run_steps(config: &DatabaseConfig) -> Result<()> {
    let db_name = config.database.as_str();

    tracing::info!("Environment variables:");
    tracing::info!("  {}: {}", POSTGRES_URI_VAR, set_marker(config.postgres_uri.is_some()));
    tracing::info!("  {}: {}", DB_URI_VAR, set_marker(config.db_uri.is_some()));
    tracing::info!("  {}: {}", DB_DATABASE_VAR, db_name);

    let postgres_uri = config.postgres_uri()?;

    tracing::info!("[1/4] Connecting to PostgreSQL server...");
    let mut admin = PgConnection::connect(postgres_uri)
        .await
        .map_err(|e| map_sqlx_error("connect to server", e))?;
    tracing::info!("  Connected to PostgreSQL server");

    tracing::info!("[2/4] Checking if database '{}' exists...", db_name);
    let ensured = ensure_database(&mut admin, db_name).await;
    release(admin).await;
    ensured?;

    tracing::info!("[3/4] Connecting to database '{}'...", db_name);
    let provider = PgConnectionProvider::new(config);
    let mut conn = provider.get_connection().await?;
    tracing::info!("  Connected to database '{}'", db_name);

    tracing::info!("[4/4] Creating 'users' table if it doesn't exist...");
    let created = sqlx::raw_sql(CREATE_USERS_TABLE).execute(&mut conn).await;
    release(conn).await;
    match created {
        Ok(_) => tracing::info!("  Table 'users' ready"),
        Err(err) if is_duplicate_table(&err) => {
            tracing::warn!("  Table 'users' was created concurrently by another process, continuing");
        }
        Err(err) => return Err(map_sqlx_error("create table", err)),
    }

    Ok(())
}

async fn ensure_database(admin: &mut PgConnection, db_name: &str) -> Result<()> {
    let exists = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(db_name)
        .fetch_optional(&mut *admin)
        .await
        .map_err(|e| map_sqlx_error("lookup database", e))?
        .is_some();

    if exists {
        tracing::info!("  Database '{}' already exists", db_name);
        return Ok(());
    }

    tracing::info!("  Database '{}' does not exist, creating...", db_name);
    // Sent over the simple query protocol: CREATE DATABASE refuses to run in
    // the implicit transaction of a prepared statement
    let statement = format!("CREATE DATABASE {}", quote_identifier(db_name));
    match sqlx::raw_sql(&statement).execute(&mut *admin).await {
        Ok(_) => {
            tracing::info!("  Database '{}' created successfully", db_name);
            Ok(())
        }
        Err(err) if is_duplicate_database(&err) => {
            tracing::warn!(
                "  Database '{}' was created concurrently by another process, continuing",
                db_name
            );
            Ok(())
        }
        Err(err) => Err(map_sqlx_error("create database", err)),
    }
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

// A racing CREATE DATABASE usually fails on the catalog index rather than with 42P04
fn is_duplicate_database(err: &sqlx::Error) -> bool {
    has_code(err, DUPLICATE_DATABASE) || is_unique_violation_on(err, &[DATABASE_NAME_INDEX])
}

fn is_duplicate_table(err: &sqlx::Error) -> bool {
    has_code(err, DUPLICATE_TABLE) || is_unique_violation_on(err, &TABLE_NAME_INDEXES)
}

/// Quotes a PostgreSQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn set_marker(is_set: bool) -> &'static str {
    if is_set {
        "set"
    } else {
        "not found"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fake_db_error::FakeDbError;
    use crate::error::{ServiceError, USERS_EMAIL_KEY};

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("db"), "\"db\"");
        assert_eq!(quote_identifier("my\"db"), "\"my\"\"db\"");
    }

    #[test]
    fn test_non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_database(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate_table(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_lost_create_database_race_is_duplicate() {
        assert!(is_duplicate_database(&FakeDbError::unique_violation(DATABASE_NAME_INDEX)));
        assert!(is_duplicate_database(&FakeDbError::with_code(
            DUPLICATE_DATABASE,
            "database \"db\" already exists"
        )));
        assert!(!is_duplicate_database(&FakeDbError::unique_violation(USERS_EMAIL_KEY)));
        assert!(!is_duplicate_database(&FakeDbError::with_code("42501", "permission denied")));
    }

    #[test]
    fn test_lost_create_table_race_is_duplicate() {
        for index in TABLE_NAME_INDEXES {
            assert!(is_duplicate_table(&FakeDbError::unique_violation(index)));
        }
        assert!(is_duplicate_table(&FakeDbError::with_code(
            DUPLICATE_TABLE,
            "relation \"users\" already exists"
        )));
        assert!(!is_duplicate_table(&FakeDbError::unique_violation(DATABASE_NAME_INDEX)));
        assert!(!is_duplicate_table(&FakeDbError::unique_violation(USERS_EMAIL_KEY)));
    }

    #[tokio::test]
    async fn test_missing_postgres_uri_aborts_initialization() {
        let config = DatabaseConfig {
            db_uri: Some("postgres://localhost/db".to_string()),
            postgres_uri: None,
            database: "db".to_string(),
        };

        let err = initialize_database(&config).await.unwrap_err();
        assert_eq!(err, ServiceError::Configuration("POSTGRES_URI not found".into()));
    }
}
