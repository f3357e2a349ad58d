use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DeletedUser, User, UserCreate};

// Expose the PostgreSQL store modules
pub mod postgres;
pub mod schema;

/// UserStore trait defining the interface for user storage implementations
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Lists every user ordered by ascending id
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Gets a user by ID
    async fn get_user(&self, id: i32) -> Result<User>;

    /// Creates a new user, failing with `Conflict` if the email is taken
    async fn create_user(&self, user: UserCreate) -> Result<User>;

    /// Deletes a user by ID
    async fn delete_user(&self, id: i32) -> Result<DeletedUser>;

    /// Runs a trivial query to prove the store is reachable
    async fn ping(&self) -> Result<()>;
}
