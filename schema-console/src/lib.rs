//! # schema-console
//!
//! An interactive client for exploring a relational database schema as a graph and
//! querying it in natural language.
//!
//! ## Features
//!
//! - Schema metadata turned into sized graph nodes and foreign-key edges
//! - Deterministic layered (Sugiyama-style) layout, left-to-right or top-to-bottom
//! - A query console state machine: free-text questions, generated SQL, editable
//!   re-execution and table inspection
//! - Stale responses from superseded requests are discarded
//! - HTTP client for the schema and query services
//!
//! The client never parses or executes SQL itself. Schema introspection, SQL
//! generation and SQL execution are remote capabilities behind [`QueryService`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use schema_console::{ConsoleConfig, ConsoleDriver, HttpQueryService, UiEvent};
//!
//! #[tokio::main]
//! async fn main() -> schema_console::Result<()> {
//!     let config = ConsoleConfig::from_env()?;
//!     let service = HttpQueryService::new(&config.service_url)?;
//!     let mut driver = ConsoleDriver::new(service, config.layout_options());
//!
//!     driver.load_schema().await?;
//!     driver.dispatch(UiEvent::QueryEdited("How many orders per user?".into()));
//!     driver.dispatch(UiEvent::QuerySubmitted);
//!     driver.next_completion().await;
//!
//!     println!("{:?}", driver.state().result_rows);
//!     Ok(())
//! }
//! ```

// Public modules
pub mod config;
pub mod console;
pub mod driver;
pub mod graph;
pub mod layout;
pub mod schema;
pub mod service;

// Public exports
pub use config::ConsoleConfig;
pub use console::{
    ActiveModal, Applied, Command, Completion, Phase, QueryConsole, SessionState, TableFetchStatus,
    Ticket, UiEvent,
};
pub use driver::ConsoleDriver;
pub use graph::{GraphEdge, GraphNode, SchemaGraph, Size, TableDescriptor};
pub use layout::{Direction, LayoutEngine, LayoutOptions, LayoutStatus, PositionedGraph, PositionedNode};
pub use schema::{ColumnInfo, ForeignKey, QueryResult, RawSchema, ResultSet};

// Re-export the service seam
pub use service::http::HttpQueryService;
pub use service::traits::{QueryService, ServiceError};

// Error type
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
