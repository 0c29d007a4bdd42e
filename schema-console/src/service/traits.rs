//! Query service trait
//!
//! This trait defines the interface the console needs from the remote services.

use crate::schema::{ExecuteQueryResponse, GenerateSqlResponse};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Remote schema introspection plus SQL generation and execution
///
/// Implementations perform exactly one request per call: no retries, no
/// timeouts beyond the transport's own, no caching.
#[async_trait]
pub trait QueryService: Send + Sync + 'static {
    /// Fetch the raw schema document (`GET /schema`)
    ///
    /// The payload is returned untyped so that a malformed document is reported
    /// by the schema adapter rather than as a transport failure.
    async fn fetch_schema(&self) -> Result<Value, ServiceError>;

    /// Translate a free-text question into SQL and execute it (`POST /generate-sql`)
    ///
    /// # Arguments
    ///
    /// * `question` - The user's free-text question
    async fn generate_sql(&self, question: &str) -> Result<GenerateSqlResponse, ServiceError>;

    /// Execute a SQL statement (`POST /execute-query`)
    ///
    /// # Arguments
    ///
    /// * `sql` - SQL statement to execute
    async fn execute_query(&self, sql: &str) -> Result<ExecuteQueryResponse, ServiceError>;
}

/// Query service error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// Invalid service address
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

impl ServiceError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ServiceError::Decode(error.to_string())
        } else {
            ServiceError::Transport(error.to_string())
        }
    }
}
