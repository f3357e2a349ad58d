use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ServiceError};
use crate::models::{DeletedUser, User, UserCreate};
use crate::store::UserStore;

struct MockState {
    users: BTreeMap<i32, User>, // id -> user, iterates in id order
    next_id: i32,
}

/// MockUserStore is a simple in-memory implementation of UserStore for testing
pub struct MockUserStore {
    state: Mutex<MockState>,
    unavailable: AtomicBool,
}

impl MockUserStore {
    /// Create a new empty MockUserStore
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                users: BTreeMap::new(),
                next_id: 1,
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create a MockUserStore with initial test data.
    ///
    /// The id sequence continues after the highest seeded id.
    pub fn with_data(users: Vec<User>) -> Self {
        let store = Self::new();

        {
            let mut state = store.state.lock().unwrap();
            for user in users {
                state.next_id = state.next_id.max(user.id + 1);
                state.users.insert(user.id, user);
            }
        }

        store
    }

    /// Makes every operation fail as if PostgreSQL could not be reached
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Internal(
                "error communicating with database: Connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MockUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.check_available()?;
        Ok(self.state.lock().unwrap().users.values().cloned().collect())
    }

    async fn get_user(&self, id: i32) -> Result<User> {
        self.check_available()?;
        self.state
            .lock()
            .unwrap()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    async fn create_user(&self, user: UserCreate) -> Result<User> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();

        if state.users.values().any(|u| u.email == user.email) {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let created = User {
            id: state.next_id,
            name: user.name,
            email: user.email,
        };
        state.next_id += 1;
        state.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete_user(&self, id: i32) -> Result<DeletedUser> {
        self.check_available()?;
        self.state
            .lock()
            .unwrap()
            .users
            .remove(&id)
            .map(|user| DeletedUser { id: user.id })
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
