//! HTTP client for the catalog service

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Book, DeletedResponse};

/// Failure of an outbound call. `Display` is the banner shown to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out while querying the API.")]
    QueryTimeout,

    #[error("Request timed out while sending data to the API.")]
    SendTimeout,

    /// Transport failure, or an error answer to a read
    #[error("Network/API error: {0}")]
    Network(String),

    /// Error answer to a create, update or delete
    #[error("{0}")]
    Rejected(String),
}

/// Form payload sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub year: Option<String>,
    pub genre: Option<String>,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        self.get("/books").await
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, ClientError> {
        self.get(&format!("/books/{}", id)).await
    }

    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, ClientError> {
        self.send(Method::POST, "/books", Some(payload)).await
    }

    pub async fn update_book(&self, id: i64, payload: &BookPayload) -> Result<Book, ClientError> {
        self.send(Method::PUT, &format!("/books/{}", id), Some(payload)).await
    }

    pub async fn delete_book(&self, id: i64) -> Result<DeletedResponse, ClientError> {
        self.send::<DeletedResponse, ()>(Method::DELETE, &format!("/books/{}", id), None)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let read_error = |e: reqwest::Error| {
            if e.is_timeout() {
                ClientError::QueryTimeout
            } else {
                ClientError::Network(e.to_string())
            }
        };

        let response = self.http.get(self.url(path)).send().await.map_err(|e| {
            tracing::warn!("GET {} failed: {}", path, e);
            read_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(status, response).await;
            tracing::warn!("GET {} answered {}: {}", path, status, message);
            return Err(ClientError::Network(message));
        }

        response.json::<T>().await.map_err(read_error)
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let send_error = |e: reqwest::Error| {
            if e.is_timeout() {
                ClientError::SendTimeout
            } else {
                ClientError::Network(e.to_string())
            }
        };

        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
            send_error(e)
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let message = error_message(status, response).await;
            tracing::info!("{} {} answered {}: {}", method, path, status, message);
            return Err(ClientError::Rejected(message));
        }

        response.json::<T>().await.map_err(send_error)
    }
}

/// The `message` of the service error envelope, or `HTTP <status>`
async fn error_message(status: StatusCode, response: reqwest::Response) -> String {
    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
