use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskUpdate},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Lists the caller's tasks, ordered by id.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(&caller).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller with `isComplete = false`.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `422 Unprocessable Entity`: empty title or over-long fields.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(&caller, &task_data).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Overwrites title, description and completion flag of one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: no such task, or it belongs to someone else.
/// - `422 Unprocessable Entity`: invalid fields.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(&caller, task_id.into_inner(), &task_data)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let confirmation = tasks.delete(&caller, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}
