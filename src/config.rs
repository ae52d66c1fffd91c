use std::env;

use crate::error::AppError;

/// Which implementation backs the credential and task stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
    pub database_max_connections: u32,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let store = match env::var("TASKMGR_STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            Ok("postgres") | Err(_) => StoreKind::Postgres,
            Ok(other) => {
                return Err(AppError::InternalServerError(format!(
                    "TASKMGR_STORE must be `postgres` or `memory`, got `{}`",
                    other
                )))
            }
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(AppError::InternalServerError(
                "DATABASE_URL must be set".into(),
            ));
        }

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InternalServerError("JWT_SECRET must be set".into()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            server_port: parse_var("SERVER_PORT", 5001)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            store,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", name))),
        Err(_) => Ok(default),
    }
}
