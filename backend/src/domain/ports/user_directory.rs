//! Driving port for user registration and lookup.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    /// Name shown to other users; validated on registration.
    pub display_name: String,
    /// Whether the user has no external identity yet.
    pub is_anonymous: bool,
    /// Whether an external identity is attached.
    pub is_linked: bool,
}

/// Driving port for registering and reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Validate and store a new user under a fresh id.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Fetch one user; not found if absent.
    async fn get(&self, id: UserId) -> Result<User, Error>;

    /// Return every user.
    async fn list(&self) -> Result<Vec<User>, Error>;
}
