use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate, User, UserRecord};

const TASK_COLUMNS: &str = r#"id, title, description, "isComplete", "userId""#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a bounded pool and applies the embedded migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("connected to database, migrations applied");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id, username",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, owner: i32) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            r#"SELECT {} FROM tasks WHERE "userId" = $1 ORDER BY id"#,
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn insert_task(&self, owner: i32, task: &NewTask) -> Result<Task, AppError> {
        let sql = format!(
            r#"INSERT INTO tasks (title, description, "userId") VALUES ($1, $2, $3) RETURNING {}"#,
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        owner: i32,
        id: i32,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let sql = format!(
            r#"UPDATE tasks SET title = $1, description = $2, "isComplete" = $3
               WHERE id = $4 AND "userId" = $5
               RETURNING {}"#,
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&update.title)
            .bind(&update.description)
            .bind(update.is_complete)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, owner: i32, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND "userId" = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
