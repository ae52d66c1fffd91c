pub mod task;
pub mod user;

pub use task::{DeleteResponse, NewTask, Task, TaskUpdate};
pub use user::{Credentials, User, UserRecord};
