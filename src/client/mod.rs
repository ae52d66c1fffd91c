//! Client side of the application: session state, a typed HTTP client and the task
//! view model that the `taskmgr-cli` binary drives.
//!
//! The session is an explicit value handed to every view operation; there is no
//! global token.

pub mod api;
pub mod error;
pub mod session;
pub mod view;

pub use api::{ApiClient, TaskApi};
pub use error::ClientError;
pub use session::{FileTokenStorage, MemoryTokenStorage, Session, TokenStorage};
pub use view::{EditState, TaskView};
