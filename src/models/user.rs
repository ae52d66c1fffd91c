use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Public projection of a user, returned by registration. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
}

/// A full `users` row, only ever seen by the auth service.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    /// bcrypt digest; the column is called `password` in the schema.
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
        }
    }
}

/// Body of both `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(
        length(min = 1, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(custom = "password_bytes")]
    pub password: String,
}

/// bcrypt only reads the first 72 bytes of its input.
const MAX_PASSWORD_BYTES: usize = 72;

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

fn password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("length");
        err.message = Some("Password must be between 1 and 72 bytes".into());
        return Err(err);
    }
    Ok(())
}
