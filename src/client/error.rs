use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the token, or there is no token at all.
    #[error("{0}")]
    Unauthorized(String),
    /// Any other non-success response, with the server's `error` message.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Message to show inline: the server's own message when there is one, `fallback`
    /// otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Unauthorized(message) | ClientError::Api { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ClientError::Api {
            status: 404,
            message: "Task not found".into(),
        };
        assert_eq!(err.user_message("Error updating task"), "Task not found");

        let err = ClientError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message("Error updating task"), "Error updating task");

        let err = ClientError::Storage(std::io::Error::other("disk full"));
        assert_eq!(err.user_message("Error fetching tasks"), "Error fetching tasks");
        assert!(!err.is_unauthorized());
    }
}
