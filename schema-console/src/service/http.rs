//! HTTP implementation of the query service

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use std::fmt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::{QueryService, ServiceError};
use crate::schema::{ExecuteQueryRequest, ExecuteQueryResponse, GenerateSqlRequest, GenerateSqlResponse};

/// Longest error body excerpt kept in a [`ServiceError::Status`]
const ERROR_BODY_LIMIT: usize = 200;

/// Query service reached over HTTP with JSON payloads
///
/// # Example
///
/// ```rust,no_run
/// use schema_console::{HttpQueryService, QueryService};
///
/// # async fn example() -> Result<(), schema_console::ServiceError> {
/// let service = HttpQueryService::new("http://localhost:5001")?;
/// let schema = service.fetch_schema().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    http: Client,
    base_url: Url,
}

impl HttpQueryService {
    /// Create a client for the service at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root, e.g. `http://localhost:5001`
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client reusing an existing `reqwest` client
    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ServiceError> {
        let mut base_url =
            Url::parse(base_url).map_err(|error| ServiceError::InvalidUrl(format!("{}: {}", base_url, error)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ServiceError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }

        // Endpoint paths are joined relative to the base, which needs a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|error| ServiceError::InvalidUrl(error.to_string()))
    }

    /// Decode a JSON body, turning non-success statuses into [`ServiceError::Status`]
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let message = status_message(status, response.text().await);
            warn!(status = status.as_u16(), %message, "Query service request failed");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| ServiceError::Decode(error.to_string()))
    }
}

/// Message for a non-success response whose body may not have been readable
fn status_message<E: fmt::Display>(status: StatusCode, body: Result<String, E>) -> String {
    match body {
        Ok(body) => error_message(&body),
        Err(error) => {
            warn!(status = status.as_u16(), %error, "Could not read error response body");
            status.canonical_reason().unwrap_or_default().to_string()
        }
    }
}

/// Prefer the `error` field of a JSON error body; fall back to the raw text
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("error") {
            return message.clone();
        }
    }
    body.trim().chars().take(ERROR_BODY_LIMIT).collect()
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn fetch_schema(&self) -> Result<Value, ServiceError> {
        let url = self.endpoint("schema")?;
        debug!(%url, "Fetching schema");

        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn generate_sql(&self, question: &str) -> Result<GenerateSqlResponse, ServiceError> {
        let url = self.endpoint("generate-sql")?;
        debug!(%url, "Requesting SQL generation");

        let response = self
            .http
            .post(url)
            .json(&GenerateSqlRequest {
                query: question.to_string(),
            })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn execute_query(&self, sql: &str) -> Result<ExecuteQueryResponse, ServiceError> {
        let url = self.endpoint("execute-query")?;
        debug!(%url, "Executing SQL");

        let response = self
            .http
            .post(url)
            .json(&ExecuteQueryRequest { query: sql.to_string() })
            .send()
            .await?;
        Self::decode(response).await
    }
}
