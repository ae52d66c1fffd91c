use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ClientError;
use crate::auth::TokenResponse;
use crate::models::{Credentials, DeleteResponse, NewTask, Task, TaskUpdate, User};

/// Task endpoints as seen by the view. The token is passed on every call.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ClientError>;
    async fn create_task(&self, token: &str, task: &NewTask) -> Result<Task, ClientError>;
    async fn update_task(
        &self,
        token: &str,
        id: i32,
        update: &TaskUpdate,
    ) -> Result<Task, ClientError>;
    async fn delete_task(&self, token: &str, id: i32) -> Result<DeleteResponse, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the whole API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let request = self.http.post(self.url("/auth/register")).json(credentials);
        send(request).await
    }

    /// Returns the session token on success.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        let request = self.http.post(self.url("/auth/login")).json(credentials);
        let body: TokenResponse = send(request).await?;
        Ok(body.token)
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ClientError> {
        send(self.http.get(self.url("/tasks")).bearer_auth(token)).await
    }

    async fn create_task(&self, token: &str, task: &NewTask) -> Result<Task, ClientError> {
        let request = self.http.post(self.url("/tasks")).bearer_auth(token).json(task);
        send(request).await
    }

    async fn update_task(
        &self,
        token: &str,
        id: i32,
        update: &TaskUpdate,
    ) -> Result<Task, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/tasks/{}", id)))
            .bearer_auth(token)
            .json(update);
        send(request).await
    }

    async fn delete_task(&self, token: &str, id: i32) -> Result<DeleteResponse, ClientError> {
        let request = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .bearer_auth(token);
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    log::debug!("request failed with {}: {}", status, message);

    if status == StatusCode::UNAUTHORIZED {
        Err(ClientError::Unauthorized(message))
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(client.url("/tasks"), "http://localhost:5001/tasks");
    }
}
