#![doc = "The `taskmgr` library crate."]
#![doc = ""]
#![doc = "Server side: domain models, the credential and task stores, the auth and task"]
#![doc = "services, the bearer-token guard, routing and error handling. Client side: the"]
#![doc = "`client` module with session state, an HTTP client and the task view model."]
#![doc = "Both binaries (`taskmgr` and `taskmgr-cli`) are thin wrappers around this crate."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
