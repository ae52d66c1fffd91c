use std::sync::Arc;

use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{DeleteResponse, NewTask, Task, TaskUpdate};
use crate::store::TaskStore;

/// Owner-scoped CRUD over the task store.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn list(&self, caller: &AuthenticatedUser) -> Result<Vec<Task>, AppError> {
        self.tasks.list_tasks(caller.id).await
    }

    /// Stores a new incomplete task. An empty description is stored as null.
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        input: &NewTask,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let input = NewTask {
            title: input.title.clone(),
            description: input.description.clone().filter(|d| !d.is_empty()),
        };
        self.tasks.insert_task(caller.id, &input).await
    }

    /// Overwrites title, description and completion flag in one statement.
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: i32,
        input: &TaskUpdate,
    ) -> Result<Task, AppError> {
        input.validate()?;
        self.tasks
            .update_task(caller.id, id, input)
            .await?
            .ok_or_else(AppError::task_not_found)
    }

    pub async fn delete(
        &self,
        caller: &AuthenticatedUser,
        id: i32,
    ) -> Result<DeleteResponse, AppError> {
        if self.tasks.delete_task(caller.id, id).await? {
            Ok(DeleteResponse::default())
        } else {
            Err(AppError::task_not_found())
        }
    }
}
