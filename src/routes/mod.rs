pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers `/auth/*` and the guarded `/tasks` routes.
///
/// Expects `web::Data<AuthService>`, `web::Data<TaskService>` and `web::Data<TokenKeys>`
/// to be registered on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// A task id that is not a valid `i32` cannot name an existing task.
fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("unparsable task id: {}", err);
    AppError::task_not_found().into()
}
