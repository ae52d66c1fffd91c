//! Business logic between the HTTP handlers and the stores.
//!
//! Services validate their input, enforce owner scoping and translate "no row" into
//! the right `AppError`. They know nothing about HTTP.

pub mod auth;
pub mod tasks;

pub use auth::AuthService;
pub use tasks::TaskService;
