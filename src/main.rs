use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use taskmgr::auth::TokenKeys;
use taskmgr::config::{Config, StoreKind};
use taskmgr::store::{MemoryStore, PgStore};
use taskmgr::{AppError, AppState};

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let keys = TokenKeys::from_secret(config.jwt_secret.as_bytes());
    match config.store {
        StoreKind::Memory => {
            log::warn!("using the in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            Ok(AppState::new(store.clone(), store, keys))
        }
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| AppError::InternalServerError("DATABASE_URL must be set".into()))?;
            let store = Arc::new(PgStore::connect(url, config.database_max_connections).await?);
            Ok(AppState::new(store.clone(), store, keys))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let state = build_state(&config)
        .await
        .map_err(std::io::Error::other)?;

    log::info!("Starting taskmgr server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
