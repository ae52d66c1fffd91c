//! Persistence for users and tasks.
//!
//! The services only see the [`UserStore`] and [`TaskStore`] traits. `PgStore` backs them
//! with PostgreSQL through a bounded `sqlx` pool; `MemoryStore` keeps everything in
//! process and is what the test suite and `TASKMGR_STORE=memory` run against.
//!
//! Every task operation takes the owner id and filters on it, so a task owned by
//! someone else behaves exactly like a task that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate, User, UserRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::ValidationError` if the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner`, ordered by id ascending.
    async fn list_tasks(&self, owner: i32) -> Result<Vec<Task>, AppError>;

    async fn insert_task(&self, owner: i32, task: &NewTask) -> Result<Task, AppError>;

    /// Returns `None` when no task `id` is owned by `owner`.
    async fn update_task(
        &self,
        owner: i32,
        id: i32,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no task `id` is owned by `owner`.
    async fn delete_task(&self, owner: i32, id: i32) -> Result<bool, AppError>;
}
