use serde::{Deserialize, Serialize};

/// Maximum length of the `name` and `email` columns.
pub const MAX_FIELD_LEN: usize = 100;

/// A persisted user row. `created_at` stays in the database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

impl UserCreate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Confirmation that a row was removed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct DeletedUser {
    pub id: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            database: "connected".to_string(),
        }
    }
}

// Response DTOs for general use across services
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub detail: String,
    pub status: u16,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn user_deleted(deleted: DeletedUser) -> Self {
        Self {
            message: format!("User {} deleted", deleted.id),
        }
    }
}
