//! Generic in-memory user storage.
//!
//! Carried over from the original application: a CRUD map for a user entity
//! that no route currently exercises. It keeps the interface a real
//! persistence layer would replace without touching handlers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<u32, User>,
    current_id: u32,
}

/// In-memory user store, safe to clone into handlers.
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, id: u32) -> Option<User> {
        self.inner.read().unwrap().users.get(&id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .unwrap()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Create a user with the next monotonically assigned id (starting at 1).
    pub fn create_user(&self, username: &str, password: &str) -> User {
        let mut inner = self.inner.write().unwrap();
        inner.current_id += 1;
        let user = User {
            id: inner.current_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        inner.users.insert(user.id, user.clone());
        user
    }
}
