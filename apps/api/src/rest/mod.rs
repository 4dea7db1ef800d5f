//! REST client for the table-style backend.
//!
//! Every call is a single HTTP request: no retry, no caching. Rows come back
//! as JSON objects and callers in `records` shape them into typed models.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod query;

pub use query::Query;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("REST backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected row shape: {0}")]
    Shape(String),
}

/// The four verbs the application issues against the backend.
/// Paths are relative to the backend base URL and carry their own filters.
#[async_trait]
pub trait RestBackend: Send + Sync {
    async fn get(&self, path: &str) -> Result<Vec<Value>, RestError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError>;

    async fn patch(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError>;

    async fn delete(&self, path: &str) -> Result<(), RestError>;
}

/// reqwest-backed implementation of [`RestBackend`].
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    username: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, token: Option<String>, username: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            username,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Stamps the configured owner onto a row body unless it already has one.
    fn with_owner(&self, body: &Value) -> Value {
        let mut body = body.clone();
        if let (Some(username), Some(row)) = (&self.username, body.as_object_mut()) {
            row.entry("username")
                .or_insert_with(|| Value::String(username.clone()));
        }
        body
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, RestError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RestError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl RestBackend for RestClient {
    async fn get(&self, path: &str) -> Result<Vec<Value>, RestError> {
        debug!("GET {path}");
        let body = self.send(self.client.get(self.url(path))).await?;
        parse_rows(&body)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError> {
        debug!("POST {path}");
        let request = self
            .client
            .post(self.url(path))
            .header("Prefer", "return=representation")
            .json(&self.with_owner(body));
        parse_rows(&self.send(request).await?)
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError> {
        debug!("PATCH {path}");
        let request = self
            .client
            .patch(self.url(path))
            .header("Prefer", "return=representation")
            .json(body);
        parse_rows(&self.send(request).await?)
    }

    async fn delete(&self, path: &str) -> Result<(), RestError> {
        debug!("DELETE {path}");
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }
}

/// Accepts an array of rows, a single row object, or an empty body.
fn parse_rows(body: &str) -> Result<Vec<Value>, RestError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Array(rows) => Ok(rows),
        row @ Value::Object(_) => Ok(vec![row]),
        other => Err(RestError::Shape(format!("expected rows, got {other}"))),
    }
}
