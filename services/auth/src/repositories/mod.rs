//! User persistence port and its adapters

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod memory;
pub mod user;

pub use memory::InMemoryUserRepository;
pub use user::PgUserRepository;

/// Port for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A taken email yields `DatabaseError::UniqueViolation`.
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> bool;
}
