use std::sync::Arc;

use actix_web::web;

use crate::auth::TokenKeys;
use crate::routes::{self, health};
use crate::services::{AuthService, TaskService};
use crate::store::{MemoryStore, TaskStore, UserStore};

/// Everything the handlers share: the two services and the token keys.
///
/// Built once in `main` (or in a test) and registered on every worker's `App`
/// through [`AppState::configure`].
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub keys: web::Data<TokenKeys>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, keys: TokenKeys) -> Self {
        Self {
            auth: web::Data::new(AuthService::new(users, keys.clone())),
            tasks: web::Data::new(TaskService::new(tasks)),
            keys: web::Data::new(keys),
        }
    }

    /// State over a fresh `MemoryStore`.
    pub fn in_memory(secret: &[u8]) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, TokenKeys::from_secret(secret))
    }

    /// Registers app data, `/health` and the API routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.keys.clone())
            .service(health::health);
        routes::config(cfg);
    }
}
