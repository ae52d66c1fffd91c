use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A task as stored in the `tasks` table and returned by the API.
///
/// The JSON field names follow the table's column names (`isComplete`, `userId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(rename = "isComplete")]
    pub is_complete: bool,
    /// Owner of the task. Set from the caller's token on creation and never changed.
    #[sqlx(rename = "userId")]
    pub user_id: i32,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Body of `PUT /tasks/{id}`. Every mutable field is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_complete: bool,
}

impl TaskUpdate {
    /// The update that keeps `task` as it is except for its completion flag.
    pub fn toggled(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            is_complete: !task.is_complete,
        }
    }
}

/// Confirmation body of `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl Default for DeleteResponse {
    fn default() -> Self {
        Self {
            message: "Task deleted successfully".into(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Title must not be empty".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_json_uses_column_names() {
        let task = Task {
            id: 1,
            title: "Buy milk".into(),
            description: None,
            is_complete: false,
            user_id: 3,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Buy milk",
                "description": null,
                "isComplete": false,
                "userId": 3
            })
        );
    }

    #[test]
    fn test_new_task_validation() {
        let valid = NewTask {
            title: "Buy milk".into(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty = NewTask {
            title: "".into(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let blank = NewTask {
            title: "   ".into(),
            description: None,
        };
        assert!(blank.validate().is_err());

        let long_description = NewTask {
            title: "ok".into(),
            description: Some("b".repeat(1001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_new_task_description_is_optional_in_json() {
        let parsed: NewTask = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn test_task_update_parses_camel_case() {
        let parsed: TaskUpdate = serde_json::from_str(
            r#"{"title":"Buy milk","description":"2 litres","isComplete":true}"#,
        )
        .unwrap();
        assert!(parsed.is_complete);
        assert_eq!(parsed.description.as_deref(), Some("2 litres"));

        let too_long = TaskUpdate {
            title: "a".repeat(201),
            description: None,
            is_complete: false,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_toggled_flips_only_completion() {
        let task = Task {
            id: 4,
            title: "Walk dog".into(),
            description: Some("evening".into()),
            is_complete: true,
            user_id: 1,
        };
        let update = TaskUpdate::toggled(&task);
        assert_eq!(update.title, "Walk dog");
        assert_eq!(update.description.as_deref(), Some("evening"));
        assert!(!update.is_complete);
    }
}
