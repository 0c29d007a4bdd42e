//! Query session state
//!
//! The single document the render surface draws from. It is only mutated by
//! [`QueryConsole`](super::QueryConsole) in response to UI events and request
//! completions.

use serde::Serialize;
use serde_json::Value;

use crate::schema::ResultSet;

/// Inline message for an empty question or an empty edited statement
pub const EMPTY_QUERY_MESSAGE: &str = "Query cannot be empty.";

/// Message for a generation response without SQL or results
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate SQL";

/// Where the console is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingGeneration,
    AwaitingExecution,
    AwaitingTableFetch,
    /// Validation failed or the service answered with an unusable payload
    Error,
}

/// Which modal is showing; at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ActiveModal {
    #[default]
    None,
    /// Generated SQL, its results and the editable statement
    QueryResult,
    /// Rows of the selected table
    TableInspection,
}

/// Progress of the table-inspection fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableFetchStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    /// Text of the question box
    pub free_text_query: String,
    /// Statement produced by the last successful generation
    pub generated_sql: String,
    /// Statement shown in the result modal, edited by the user
    pub editable_sql: String,
    pub result_columns: Vec<String>,
    pub result_rows: Vec<Vec<Value>>,
    pub selected_table: Option<String>,
    /// Inline error shown next to the question box
    pub error_message: Option<String>,
    /// Blocking notification the user has to dismiss
    pub alert: Option<String>,
    pub modal: ActiveModal,
    /// Set while the table-inspection modal is open
    pub table_status: Option<TableFetchStatus>,
    pub phase: Phase,
}

impl SessionState {
    pub fn is_result_modal_open(&self) -> bool {
        self.modal == ActiveModal::QueryResult
    }

    pub fn is_table_modal_open(&self) -> bool {
        self.modal == ActiveModal::TableInspection
    }

    pub(super) fn set_results(&mut self, results: ResultSet) {
        self.result_columns = results.columns;
        self.result_rows = results.rows;
    }

    pub(super) fn clear_results(&mut self) {
        self.result_columns.clear();
        self.result_rows.clear();
    }

    /// Close the result modal and forget everything it showed
    pub(super) fn close_result_modal(&mut self) {
        if self.modal == ActiveModal::QueryResult {
            self.modal = ActiveModal::None;
        }
        self.generated_sql.clear();
        self.editable_sql.clear();
        self.clear_results();
    }

    /// Close the table modal and forget the selected table and its rows
    pub(super) fn close_table_modal(&mut self) {
        if self.modal == ActiveModal::TableInspection {
            self.modal = ActiveModal::None;
        }
        self.selected_table = None;
        self.table_status = None;
        self.clear_results();
    }
}
