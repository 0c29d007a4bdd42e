//! Wire types exchanged with the schema and query services
//!
//! Field names follow the services' snake_case JSON payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Information about a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// SQL data type as reported by the database (e.g., "integer", "character varying")
    #[serde(rename = "type")]
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A directed reference from one table to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing table
    pub source_table: String,

    /// Referenced table
    pub target_table: String,

    /// Referencing column (if reported)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,

    /// Referenced column (if reported)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
}

impl ForeignKey {
    pub fn new(source_table: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            target_table: target_table.into(),
            source_column: None,
            target_column: None,
        }
    }
}

/// Response of `GET /schema`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSchema {
    /// Table name -> ordered column list
    pub tables: BTreeMap<String, Vec<ColumnInfo>>,

    /// Foreign key relationships, in the order the service reported them
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

/// Query result payload embedded in both query endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names of the result (may be empty when the service could not resolve them)
    #[serde(default)]
    pub columns: Vec<String>,

    /// Result rows, absent when execution failed
    #[serde(default)]
    pub results: Option<Vec<Vec<Value>>>,

    /// Execution error reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /generate-sql`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSqlRequest {
    /// Free-text question
    pub query: String,
}

/// Response of `POST /generate-sql`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateSqlResponse {
    /// Generated SQL statement
    #[serde(default)]
    pub sql: Option<String>,

    /// Result of executing the generated statement
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

/// Body of `POST /execute-query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteQueryRequest {
    /// SQL statement to execute
    pub query: String,
}

/// Response of `POST /execute-query`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteQueryResponse {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

/// A validated result: every row is as wide as the column list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Reasons a [`QueryResult`] cannot be shown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultSetError {
    /// The service executed the statement and reported an error
    #[error("{0}")]
    Reported(String),

    /// Neither rows nor an error were returned
    #[error("query result has no rows")]
    MissingResults,

    /// A row does not match the column count
    #[error("row {row} has {found} cells but the result has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl TryFrom<QueryResult> for ResultSet {
    type Error = ResultSetError;

    fn try_from(result: QueryResult) -> Result<Self, Self::Error> {
        if let Some(message) = result.error {
            return Err(ResultSetError::Reported(message));
        }

        let rows = result.results.ok_or(ResultSetError::MissingResults)?;

        // Column names are optional; when present they must line up with every row
        if !result.columns.is_empty() {
            let expected = result.columns.len();
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != expected)
            {
                return Err(ResultSetError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }

        Ok(ResultSet {
            columns: result.columns,
            rows,
        })
    }
}
