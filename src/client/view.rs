use std::fmt::Write;

use super::api::TaskApi;
use super::error::ClientError;
use super::session::{Session, TokenStorage};
use crate::models::{NewTask, Task, TaskUpdate};

/// In-place edit of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: i32,
    pub title: String,
    pub description: String,
}

/// View model of the task list.
///
/// `tasks` mirrors the last server state. Mutations are applied locally only after the
/// server confirms them, using the row it returned, so a failure leaves the list as
/// it was and only sets `error`. A rejected token clears the session and raises
/// `needs_login`.
#[derive(Debug, Default)]
pub struct TaskView {
    pub tasks: Vec<Task>,
    pub new_title: String,
    pub new_description: String,
    pub editing: Option<EditState>,
    pub error: Option<String>,
    pub needs_login: bool,
}

impl TaskView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial fetch of the full list.
    pub async fn mount<A, S>(&mut self, api: &A, session: &mut Session<S>)
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(token) = self.token(session) else {
            return;
        };
        match api.list_tasks(&token).await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.error = None;
            }
            Err(err) => self.fail(session, err, "Error fetching tasks"),
        }
    }

    /// Creates a task from the form fields and clears the form on success.
    pub async fn create<A, S>(&mut self, api: &A, session: &mut Session<S>)
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(token) = self.token(session) else {
            return;
        };
        let input = NewTask {
            title: self.new_title.clone(),
            description: non_empty(&self.new_description),
        };
        match api.create_task(&token, &input).await {
            Ok(task) => {
                self.tasks.push(task);
                self.new_title.clear();
                self.new_description.clear();
                self.error = None;
            }
            Err(err) => self.fail(session, err, "Error creating task"),
        }
    }

    pub async fn toggle_completion<A, S>(&mut self, api: &A, session: &mut Session<S>, id: i32)
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(update) = self.find(id).map(TaskUpdate::toggled) else {
            self.error = Some("Task not found".into());
            return;
        };
        self.send_update(api, session, id, update).await;
    }

    /// Enters edit mode for `id`, prefilled with its current title and description.
    pub fn start_editing(&mut self, id: i32) -> bool {
        match self.find(id) {
            Some(task) => {
                self.editing = Some(EditState {
                    id,
                    title: task.title.clone(),
                    description: task.description.clone().unwrap_or_default(),
                });
                true
            }
            None => false,
        }
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Saves the edit, keeping the task's current completion flag.
    pub async fn save_edit<A, S>(&mut self, api: &A, session: &mut Session<S>)
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(edit) = self.editing.clone() else {
            return;
        };
        let update = TaskUpdate {
            title: edit.title,
            description: non_empty(&edit.description),
            is_complete: self.find(edit.id).map(|t| t.is_complete).unwrap_or(false),
        };
        if self.send_update(api, session, edit.id, update).await {
            self.cancel_editing();
        }
    }

    pub async fn delete<A, S>(&mut self, api: &A, session: &mut Session<S>, id: i32)
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(token) = self.token(session) else {
            return;
        };
        match api.delete_task(&token, id).await {
            Ok(_) => {
                self.tasks.retain(|t| t.id != id);
                self.error = None;
            }
            Err(err) => self.fail(session, err, "Error deleting task"),
        }
    }

    pub fn find(&self, id: i32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Plain-text listing, one task per line plus an indented description.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(out, "error: {}", error);
        }
        if self.tasks.is_empty() {
            out.push_str("No tasks.\n");
        }
        for task in &self.tasks {
            let mark = if task.is_complete { "x" } else { " " };
            let _ = writeln!(out, "[{}] {:>4}  {}", mark, task.id, task.title);
            if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "          {}", description);
            }
        }
        out
    }

    async fn send_update<A, S>(
        &mut self,
        api: &A,
        session: &mut Session<S>,
        id: i32,
        update: TaskUpdate,
    ) -> bool
    where
        A: TaskApi + ?Sized,
        S: TokenStorage,
    {
        let Some(token) = self.token(session) else {
            return false;
        };
        match api.update_task(&token, id, &update).await {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = updated;
                }
                self.error = None;
                true
            }
            Err(err) => {
                self.fail(session, err, "Error updating task");
                false
            }
        }
    }

    fn token<S: TokenStorage>(&mut self, session: &mut Session<S>) -> Option<String> {
        match session.token() {
            Some(token) => Some(token.to_string()),
            None => {
                self.fail(
                    session,
                    ClientError::Unauthorized("Not logged in".into()),
                    "Not logged in",
                );
                None
            }
        }
    }

    fn fail<S: TokenStorage>(&mut self, session: &mut Session<S>, err: ClientError, fallback: &str) {
        if err.is_unauthorized() {
            if let Err(e) = session.logout() {
                log::warn!("could not clear stored token: {}", e);
            }
            self.needs_login = true;
        }
        self.error = Some(err.user_message(fallback));
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::MemoryTokenStorage;
    use crate::models::DeleteResponse;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Owner-less fake server: accepts only `VALID` as token.
    #[derive(Default)]
    struct FakeApi {
        tasks: Mutex<Vec<Task>>,
        fail_with: Mutex<Option<(u16, String)>>,
    }

    const VALID: &str = "valid-token";

    impl FakeApi {
        fn check(&self, token: &str) -> Result<(), ClientError> {
            if token != VALID {
                return Err(ClientError::Unauthorized("Invalid token".into()));
            }
            if let Some((status, message)) = self.fail_with.lock().unwrap().clone() {
                return Err(ClientError::Api { status, message });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TaskApi for FakeApi {
        async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ClientError> {
            self.check(token)?;
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create_task(&self, token: &str, task: &NewTask) -> Result<Task, ClientError> {
            self.check(token)?;
            let mut tasks = self.tasks.lock().unwrap();
            let created = Task {
                id: tasks.len() as i32 + 1,
                title: task.title.clone(),
                description: task.description.clone(),
                is_complete: false,
                user_id: 1,
            };
            tasks.push(created.clone());
            Ok(created)
        }

        async fn update_task(
            &self,
            token: &str,
            id: i32,
            update: &TaskUpdate,
        ) -> Result<Task, ClientError> {
            self.check(token)?;
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ClientError::Api {
                    status: 404,
                    message: "Task not found".into(),
                })?;
            task.title = update.title.clone();
            task.description = update.description.clone();
            task.is_complete = update.is_complete;
            Ok(task.clone())
        }

        async fn delete_task(&self, token: &str, id: i32) -> Result<DeleteResponse, ClientError> {
            self.check(token)?;
            let mut tasks = self.tasks.lock().unwrap();
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                return Err(ClientError::Api {
                    status: 404,
                    message: "Task not found".into(),
                });
            }
            Ok(DeleteResponse::default())
        }
    }

    fn logged_in() -> Session<MemoryTokenStorage> {
        Session::load(MemoryTokenStorage::with_token(VALID)).unwrap()
    }

    #[tokio::test]
    async fn test_create_toggle_edit_delete() {
        let api = FakeApi::default();
        let mut session = logged_in();
        let mut view = TaskView::new();
        view.mount(&api, &mut session).await;
        assert!(view.tasks.is_empty());

        view.new_title = "Buy milk".into();
        view.create(&api, &mut session).await;
        assert_eq!(view.tasks.len(), 1);
        assert!(view.new_title.is_empty());
        assert_eq!(view.tasks[0].description, None);
        let id = view.tasks[0].id;

        view.toggle_completion(&api, &mut session, id).await;
        assert!(view.tasks[0].is_complete);

        assert!(view.start_editing(id));
        if let Some(edit) = view.editing.as_mut() {
            edit.title = "Buy oat milk".into();
            edit.description = "2 litres".into();
        }
        view.save_edit(&api, &mut session).await;
        assert_eq!(view.editing, None);
        assert_eq!(view.tasks[0].title, "Buy oat milk");
        assert!(view.tasks[0].is_complete, "editing keeps completion flag");

        view.delete(&api, &mut session, id).await;
        assert!(view.tasks.is_empty());
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn test_failure_leaves_list_unchanged() {
        let api = FakeApi::default();
        let mut session = logged_in();
        let mut view = TaskView::new();
        view.new_title = "Keep me".into();
        view.create(&api, &mut session).await;
        let before = view.tasks.clone();

        *api.fail_with.lock().unwrap() = Some((500, "Database error".into()));
        view.toggle_completion(&api, &mut session, before[0].id).await;
        view.delete(&api, &mut session, before[0].id).await;

        assert_eq!(view.tasks, before);
        assert_eq!(view.error.as_deref(), Some("Database error"));
        assert!(session.is_authenticated());
        assert!(!view.needs_login);
    }

    #[tokio::test]
    async fn test_rejected_token_clears_session() {
        let api = FakeApi::default();
        let mut session = Session::load(MemoryTokenStorage::with_token("expired")).unwrap();
        let mut view = TaskView::new();

        view.mount(&api, &mut session).await;

        assert!(view.needs_login);
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().load().unwrap(), None);
        assert_eq!(view.error.as_deref(), Some("Invalid token"));
    }

    #[tokio::test]
    async fn test_operations_without_session_require_login() {
        let api = FakeApi::default();
        let mut session = Session::load(MemoryTokenStorage::new()).unwrap();
        let mut view = TaskView::new();
        view.new_title = "Nope".into();

        view.create(&api, &mut session).await;

        assert!(view.needs_login);
        assert!(api.tasks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_marks_completed_tasks() {
        let view = TaskView {
            tasks: vec![
                Task {
                    id: 1,
                    title: "Buy milk".into(),
                    description: Some("2 litres".into()),
                    is_complete: true,
                    user_id: 1,
                },
                Task {
                    id: 2,
                    title: "Walk dog".into(),
                    description: None,
                    is_complete: false,
                    user_id: 1,
                },
            ],
            ..TaskView::default()
        };
        let rendered = view.render();
        assert!(rendered.contains("[x]    1  Buy milk"));
        assert!(rendered.contains("2 litres"));
        assert!(rendered.contains("[ ]    2  Walk dog"));
        assert_eq!(TaskView::new().render(), "No tasks.\n");
    }
}
