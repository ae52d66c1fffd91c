use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate, User, UserRecord};

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    // Keyed by id so iteration order is id ascending, matching `ORDER BY id`.
    tasks: BTreeMap<i32, Task>,
    next_user_id: i32,
    next_task_id: i32,
}

/// In-process store with the same observable behaviour as `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(AppError::ValidationError("Username already exists".into()));
        }
        tables.next_user_id += 1;
        let record = UserRecord {
            id: tables.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.users.push(record.clone());
        Ok(record.into())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner: i32) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, owner: i32, task: &NewTask) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == owner) {
            return Err(AppError::DatabaseError(format!(
                "task owner {} does not reference an existing user",
                owner
            )));
        }
        tables.next_task_id += 1;
        let created = Task {
            id: tables.next_task_id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_complete: false,
            user_id: owner,
        };
        tables.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_task(
        &self,
        owner: i32,
        id: i32,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get_mut(&id) {
            Some(task) if task.user_id == owner => {
                task.title = update.title.clone();
                task.description = update.description.clone();
                task.is_complete = update.is_complete;
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, owner: i32, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get(&id) {
            Some(task) if task.user_id == owner => {
                tables.tasks.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
