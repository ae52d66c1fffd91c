use crate::{auth::TokenResponse, error::AppError, models::Credentials, services::AuthService};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Responds `201 Created` with `{id, username}`.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let user = auth.register(&register_data).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Responds `200 OK` with `{token}`, or `401` with a generic message.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let token = auth.login(&login_data).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
