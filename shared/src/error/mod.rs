use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Closed set of failures a store or handler can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Configuration(_) => 500,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 400,
            ServiceError::Validation(_) => 422,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message shown to API clients.
    pub fn detail(&self) -> String {
        match self {
            ServiceError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn missing_setting(name: &str) -> Self {
        ServiceError::Configuration(format!("{} not found", name))
    }
}

/// Unique constraint PostgreSQL generates for `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// True when `err` is a unique violation on one of the named constraints or indexes.
pub fn is_unique_violation_on(err: &sqlx::Error, constraints: &[&str]) -> bool {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => match db_err.constraint() {
            Some(name) => constraints.iter().any(|c| *c == name),
            None => constraints.iter().any(|name| db_err.message().contains(name)),
        },
        _ => false,
    }
}

// Map a sqlx failure from the given operation. Only the email constraint is a
// client conflict; any other unique violation is internal.
pub fn map_sqlx_error(operation: &str, err: sqlx::Error) -> ServiceError {
    if is_unique_violation_on(&err, &[USERS_EMAIL_KEY]) {
        return ServiceError::Conflict("Email already exists".to_string());
    }
    tracing::debug!("PostgreSQL {} failed: {:?}", operation, err);
    ServiceError::Internal(err.to_string())
}

#[cfg(test)]
pub(crate) mod fake_db_error {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    /// Hand-built PostgreSQL error for exercising error classification offline.
    #[derive(Debug)]
    pub struct FakeDbError {
        pub code: &'static str,
        pub constraint: Option<&'static str>,
        pub message: String,
    }

    impl FakeDbError {
        pub fn unique_violation(constraint: &'static str) -> sqlx::Error {
            sqlx::Error::Database(Box::new(FakeDbError {
                code: "23505",
                constraint: Some(constraint),
                message: format!("duplicate key value violates unique constraint \"{}\"", constraint),
            }))
        }

        pub fn with_code(code: &'static str, message: &str) -> sqlx::Error {
            sqlx::Error::Database(Box::new(FakeDbError {
                code,
                constraint: None,
                message: message.to_string(),
            }))
        }
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake_db_error::FakeDbError;
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::missing_setting("DB_URI").status_code(), 500);
        assert_eq!(ServiceError::NotFound("User not found".into()).status_code(), 404);
        assert_eq!(ServiceError::Conflict("Email already exists".into()).status_code(), 400);
        assert_eq!(ServiceError::Validation("name is required".into()).status_code(), 422);
        assert_eq!(ServiceError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_detail_messages() {
        assert_eq!(ServiceError::NotFound("User not found".into()).detail(), "User not found");
        assert_eq!(
            ServiceError::missing_setting("DB_URI").detail(),
            "Configuration error: DB_URI not found"
        );
        assert_eq!(ServiceError::Validation("name is required".into()).detail(), "name is required");
    }

    #[test]
    fn test_non_database_sqlx_errors_are_internal() {
        let err = map_sqlx_error("get_user", sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_only_email_unique_violation_is_conflict() {
        let err = map_sqlx_error("create_user", FakeDbError::unique_violation(USERS_EMAIL_KEY));
        assert_eq!(err, ServiceError::Conflict("Email already exists".into()));

        // Catalog collisions from concurrent DDL must not look like a duplicate email
        for index in ["pg_database_datname_index", "pg_type_typname_nsp_index", "users_pkey"] {
            let err = map_sqlx_error("create table", FakeDbError::unique_violation(index));
            assert!(matches!(err, ServiceError::Internal(_)), "{} mapped to {:?}", index, err);
        }
    }

    #[test]
    fn test_unique_violation_without_constraint_falls_back_to_message() {
        let err = FakeDbError::with_code(
            "23505",
            "duplicate key value violates unique constraint \"pg_database_datname_index\"",
        );
        assert!(is_unique_violation_on(&err, &["pg_database_datname_index"]));
        assert!(!is_unique_violation_on(&err, &[USERS_EMAIL_KEY]));
    }
}
