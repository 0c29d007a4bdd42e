//! Query console state machine
//!
//! Events from the render surface go in, [`Command`]s describing remote
//! requests come out. Responses come back as [`Completion`]s. Each command
//! carries a [`Ticket`]; a completion is applied only while its ticket is the
//! latest one issued for its [`Slot`] and has not been invalidated by a modal
//! close, so a slow response can never overwrite the state produced by a later
//! action. Requests in different slots do not supersede each other.

use tracing::{debug, warn};

use super::state::{
    ActiveModal, Phase, SessionState, TableFetchStatus, EMPTY_QUERY_MESSAGE, GENERATION_FAILED_MESSAGE,
};
use crate::schema::{ExecuteQueryResponse, GenerateSqlResponse, ResultSet, ResultSetError};
use crate::service::ServiceError;

/// Logical action a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Generation,
    Execution,
    TableFetch,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::Generation, Slot::Execution, Slot::TableFetch];

    fn index(self) -> usize {
        match self {
            Slot::Generation => 0,
            Slot::Execution => 1,
            Slot::TableFetch => 2,
        }
    }

    /// Phase shown while a request in this slot is pending
    fn awaiting(self) -> Phase {
        match self {
            Slot::Generation => Phase::AwaitingGeneration,
            Slot::Execution => Phase::AwaitingExecution,
            Slot::TableFetch => Phase::AwaitingTableFetch,
        }
    }
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub slot: Slot,
    pub sequence: u64,
}

/// User input forwarded by the render surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The question box changed
    QueryEdited(String),
    /// The submit button was pressed
    QuerySubmitted,
    /// A table node was clicked
    NodeClicked(String),
    /// The SQL in the result modal changed
    SqlEdited(String),
    /// The edited SQL should be re-executed
    SqlExecuted,
    ResultModalClosed,
    TableModalClosed,
    AlertDismissed,
}

/// A remote request the console wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GenerateSql { ticket: Ticket, question: String },
    ExecuteSql { ticket: Ticket, sql: String },
    FetchTable { ticket: Ticket, table: String, sql: String },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::GenerateSql { ticket, .. }
            | Command::ExecuteSql { ticket, .. }
            | Command::FetchTable { ticket, .. } => *ticket,
        }
    }
}

/// Outcome of a remote request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Generated {
        ticket: Ticket,
        result: Result<GenerateSqlResponse, ServiceError>,
    },
    Executed {
        ticket: Ticket,
        result: Result<ExecuteQueryResponse, ServiceError>,
    },
    TableFetched {
        ticket: Ticket,
        result: Result<ExecuteQueryResponse, ServiceError>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Completion::Generated { ticket, .. }
            | Completion::Executed { ticket, .. }
            | Completion::TableFetched { ticket, .. } => *ticket,
        }
    }

    fn slot(&self) -> Slot {
        match self {
            Completion::Generated { .. } => Slot::Generation,
            Completion::Executed { .. } => Slot::Execution,
            Completion::TableFetched { .. } => Slot::TableFetch,
        }
    }
}

/// Whether a completion changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// Superseded by a later action or discarded by a modal close
    Stale,
}

/// Quote an identifier (table name) for the "select all rows" statement
///
/// Double quotes inside the identifier are escaped by doubling them.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Statement used to inspect a table
pub fn select_all_sql(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}

#[derive(Debug, Default)]
pub struct QueryConsole {
    state: SessionState,
    next_sequence: u64,
    /// Latest live ticket per slot, indexed by [`Slot::index`]
    in_flight: [Option<Ticket>; 3],
}

impl QueryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The request in `slot` whose completion will be applied, if any
    pub fn in_flight(&self, slot: Slot) -> Option<Ticket> {
        self.in_flight[slot.index()]
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.iter().any(Option::is_some)
    }

    /// Show a blocking notification raised outside the console (e.g. a failed schema load)
    pub fn raise_alert(&mut self, message: String) {
        self.state.alert = Some(message);
    }

    /// Apply a UI event, returning the request to issue (if any)
    pub fn handle(&mut self, event: UiEvent) -> Option<Command> {
        match event {
            UiEvent::QueryEdited(text) => {
                self.state.free_text_query = text;
                None
            }
            UiEvent::QuerySubmitted => self.submit_query(),
            UiEvent::NodeClicked(table) => Some(self.open_table(table)),
            UiEvent::SqlEdited(sql) => {
                if self.state.is_result_modal_open() {
                    self.state.editable_sql = sql;
                }
                None
            }
            UiEvent::SqlExecuted => self.execute_edited_sql(),
            UiEvent::ResultModalClosed => {
                self.close_result_modal();
                None
            }
            UiEvent::TableModalClosed => {
                self.close_table_modal();
                None
            }
            UiEvent::AlertDismissed => {
                self.state.alert = None;
                None
            }
        }
    }

    /// Submit the free-text question for SQL generation
    pub fn submit_query(&mut self) -> Option<Command> {
        let question = self.state.free_text_query.trim();
        if question.is_empty() {
            self.state.error_message = Some(EMPTY_QUERY_MESSAGE.to_string());
            self.state.phase = Phase::Error;
            return None;
        }

        let question = question.to_string();
        self.state.error_message = None;
        self.state.phase = Phase::AwaitingGeneration;
        let ticket = self.issue(Slot::Generation);
        debug!(sequence = ticket.sequence, "Submitting question for SQL generation");

        Some(Command::GenerateSql { ticket, question })
    }

    /// Open the inspection modal for `table` and request its rows
    ///
    /// The modal opens immediately; rows arrive with the completion.
    pub fn open_table(&mut self, table: String) -> Command {
        self.state.close_result_modal();
        self.invalidate(&[Slot::Generation, Slot::Execution]);
        self.state.selected_table = Some(table.clone());
        self.state.table_status = Some(TableFetchStatus::Loading);
        self.state.modal = ActiveModal::TableInspection;
        self.state.phase = Phase::AwaitingTableFetch;

        let ticket = self.issue(Slot::TableFetch);
        debug!(sequence = ticket.sequence, %table, "Fetching table rows");

        Command::FetchTable {
            ticket,
            sql: select_all_sql(&table),
            table,
        }
    }

    /// Re-execute the statement edited in the result modal
    pub fn execute_edited_sql(&mut self) -> Option<Command> {
        if !self.state.is_result_modal_open() {
            debug!("Ignoring SQL execution without an open result modal");
            return None;
        }

        let sql = self.state.editable_sql.trim();
        if sql.is_empty() {
            self.state.error_message = Some(EMPTY_QUERY_MESSAGE.to_string());
            self.state.phase = Phase::Error;
            return None;
        }

        let sql = sql.to_string();
        self.state.error_message = None;
        self.state.phase = Phase::AwaitingExecution;
        let ticket = self.issue(Slot::Execution);
        debug!(sequence = ticket.sequence, "Executing edited SQL");

        Some(Command::ExecuteSql { ticket, sql })
    }

    pub fn close_result_modal(&mut self) {
        if !self.state.is_result_modal_open() {
            return;
        }
        self.state.close_result_modal();
        self.invalidate(&[Slot::Generation, Slot::Execution]);
    }

    pub fn close_table_modal(&mut self) {
        if !self.state.is_table_modal_open() {
            return;
        }
        self.state.close_table_modal();
        self.invalidate(&[Slot::TableFetch]);
    }

    /// Apply the outcome of a request issued earlier
    pub fn complete(&mut self, completion: Completion) -> Applied {
        let ticket = completion.ticket();
        let slot = completion.slot();
        if ticket.slot != slot || self.in_flight(slot) != Some(ticket) {
            warn!(
                slot = ?ticket.slot,
                sequence = ticket.sequence,
                "Discarding stale response"
            );
            return Applied::Stale;
        }
        self.in_flight[slot.index()] = None;
        self.settle_phase();

        match completion {
            Completion::Generated { result, .. } => self.apply_generation(result),
            Completion::Executed { result, .. } => self.apply_execution(result),
            Completion::TableFetched { result, .. } => self.apply_table_fetch(result),
        }

        Applied::Applied
    }

    fn apply_generation(&mut self, result: Result<GenerateSqlResponse, ServiceError>) {
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "SQL generation failed");
                self.state.alert = Some(format!("{}: {}", GENERATION_FAILED_MESSAGE, error.user_message()));
                return;
            }
        };

        let (sql, query_result) = match (response.sql, response.query_result) {
            (Some(sql), Some(query_result)) => (sql, query_result),
            _ => {
                warn!("Generation response is missing `sql` or `query_result`");
                self.fail(GENERATION_FAILED_MESSAGE.to_string());
                return;
            }
        };

        match ResultSet::try_from(query_result) {
            Ok(results) => {
                // New results replace the table view and any pending re-execution
                self.state.close_table_modal();
                self.invalidate(&[Slot::TableFetch, Slot::Execution]);
                self.state.generated_sql = sql.clone();
                self.state.editable_sql = sql;
                self.state.set_results(results);
                self.state.error_message = None;
                self.state.modal = ActiveModal::QueryResult;
            }
            Err(ResultSetError::Reported(message)) => {
                self.fail(format!("{}: {}", GENERATION_FAILED_MESSAGE, message));
            }
            Err(error) => {
                warn!(%error, "Generation response has an unusable result");
                self.fail(GENERATION_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn apply_execution(&mut self, result: Result<ExecuteQueryResponse, ServiceError>) {
        match into_result_set(result) {
            Ok(results) => {
                // The modal stays open; only the rows change
                self.state.set_results(results);
            }
            Err(message) => {
                warn!(%message, "SQL execution failed");
                self.state.alert = Some(format!("Failed to execute query: {}", message));
            }
        }
    }

    fn apply_table_fetch(&mut self, result: Result<ExecuteQueryResponse, ServiceError>) {
        match into_result_set(result) {
            Ok(results) => {
                self.state.set_results(results);
                self.state.table_status = Some(TableFetchStatus::Loaded);
            }
            Err(message) => {
                let table = self.state.selected_table.clone().unwrap_or_default();
                warn!(%table, %message, "Table fetch failed");
                self.state.alert = Some(format!("Failed to load table {}: {}", table, message));
                self.state.table_status = Some(TableFetchStatus::Failed(message));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.state.error_message = Some(message);
        self.state.phase = Phase::Error;
    }

    /// Issue a ticket; it supersedes the request pending in the same slot
    fn issue(&mut self, slot: Slot) -> Ticket {
        self.next_sequence += 1;
        let ticket = Ticket {
            slot,
            sequence: self.next_sequence,
        };
        if let Some(previous) = self.in_flight[slot.index()].replace(ticket) {
            debug!(
                slot = ?slot,
                superseded = previous.sequence,
                by = ticket.sequence,
                "Superseding in-flight request"
            );
        }
        ticket
    }

    fn invalidate(&mut self, slots: &[Slot]) {
        for slot in slots {
            if let Some(ticket) = self.in_flight[slot.index()].take() {
                debug!(slot = ?slot, sequence = ticket.sequence, "Discarding in-flight request");
            }
        }
        if self.state.phase != Phase::Error {
            self.settle_phase();
        }
    }

    /// Show the most recently issued pending request, or idle
    fn settle_phase(&mut self) {
        self.state.phase = Slot::ALL
            .iter()
            .filter_map(|slot| self.in_flight(*slot))
            .max_by_key(|ticket| ticket.sequence)
            .map_or(Phase::Idle, |ticket| ticket.slot.awaiting());
    }
}

/// Flatten transport and payload failures of the execute endpoint into a message
fn into_result_set(result: Result<ExecuteQueryResponse, ServiceError>) -> Result<ResultSet, String> {
    let response = result.map_err(|error| error.user_message())?;
    let query_result = response
        .query_result
        .ok_or_else(|| "response has no query result".to_string())?;
    ResultSet::try_from(query_result).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QueryResult;
    use serde_json::json;

    fn rows_result(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> QueryResult {
        QueryResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            results: Some(rows),
            error: None,
        }
    }

    fn submit(console: &mut QueryConsole, question: &str) -> Command {
        console.handle(UiEvent::QueryEdited(question.to_string()));
        console.handle(UiEvent::QuerySubmitted).expect("command")
    }

    fn generated(console: &mut QueryConsole, ticket: Ticket, sql: &str) -> Applied {
        console.complete(Completion::Generated {
            ticket,
            result: Ok(GenerateSqlResponse {
                sql: Some(sql.to_string()),
                query_result: Some(rows_result(&["count"], vec![vec![json!(3)]])),
            }),
        })
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("table\"name"), "\"table\"\"name\"");
        assert_eq!(select_all_sql("orders"), "SELECT * FROM \"orders\"");
    }

    #[test]
    fn test_empty_query_is_rejected_locally() {
        let mut console = QueryConsole::new();
        console.handle(UiEvent::QueryEdited("   \n\t".to_string()));

        assert_eq!(console.handle(UiEvent::QuerySubmitted), None);
        assert_eq!(console.state().phase, Phase::Error);
        assert_eq!(console.state().error_message.as_deref(), Some("Query cannot be empty."));
        assert!(!console.is_busy());
    }

    #[test]
    fn test_successful_generation_opens_result_modal() {
        let mut console = QueryConsole::new();
        let command = submit(&mut console, "  how many users?  ");

        let ticket = match &command {
            Command::GenerateSql { ticket, question } => {
                assert_eq!(question, "how many users?");
                *ticket
            }
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(console.state().phase, Phase::AwaitingGeneration);

        assert_eq!(generated(&mut console, ticket, "SELECT count(*) FROM users"), Applied::Applied);

        let state = console.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.is_result_modal_open());
        assert_eq!(state.generated_sql, "SELECT count(*) FROM users");
        assert_eq!(state.editable_sql, state.generated_sql);
        assert_eq!(state.result_columns, vec!["count".to_string()]);
        assert_eq!(state.result_rows, vec![vec![json!(3)]]);
    }

    #[test]
    fn test_missing_query_result_is_an_error() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "anything").ticket();

        console.complete(Completion::Generated {
            ticket,
            result: Ok(GenerateSqlResponse {
                sql: Some("SELECT 1".to_string()),
                query_result: None,
            }),
        });

        let state = console.state();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error_message.as_deref(), Some("Failed to generate SQL"));
        assert!(!state.is_result_modal_open());
        assert!(state.generated_sql.is_empty());
    }

    #[test]
    fn test_ragged_rows_are_an_error() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "anything").ticket();

        console.complete(Completion::Generated {
            ticket,
            result: Ok(GenerateSqlResponse {
                sql: Some("SELECT a, b FROM t".to_string()),
                query_result: Some(rows_result(&["a", "b"], vec![vec![json!(1)]])),
            }),
        });

        assert_eq!(console.state().phase, Phase::Error);
        assert_eq!(console.state().error_message.as_deref(), Some("Failed to generate SQL"));
    }

    #[test]
    fn test_generation_transport_failure_raises_alert() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "anything").ticket();

        console.complete(Completion::Generated {
            ticket,
            result: Err(ServiceError::Transport("connection refused".to_string())),
        });

        let state = console.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.alert.as_deref().unwrap().starts_with("Failed to generate SQL"));
        assert!(!state.is_result_modal_open());

        console.handle(UiEvent::AlertDismissed);
        assert_eq!(console.state().alert, None);
    }

    #[test]
    fn test_node_click_opens_table_modal_immediately() {
        let mut console = QueryConsole::new();
        let command = console.handle(UiEvent::NodeClicked("orders".to_string())).unwrap();

        match &command {
            Command::FetchTable { table, sql, .. } => {
                assert_eq!(table, "orders");
                assert_eq!(sql, "SELECT * FROM \"orders\"");
            }
            other => panic!("unexpected command {:?}", other),
        }

        let state = console.state();
        assert!(state.is_table_modal_open());
        assert_eq!(state.selected_table.as_deref(), Some("orders"));
        assert_eq!(state.table_status, Some(TableFetchStatus::Loading));
        assert_eq!(state.phase, Phase::AwaitingTableFetch);
        assert!(state.result_rows.is_empty());

        console.complete(Completion::TableFetched {
            ticket: command.ticket(),
            result: Ok(ExecuteQueryResponse {
                query_result: Some(rows_result(&["id", "user_id"], vec![vec![json!(1), json!(7)]])),
            }),
        });

        let state = console.state();
        assert_eq!(state.table_status, Some(TableFetchStatus::Loaded));
        assert_eq!(state.result_columns, vec!["id".to_string(), "user_id".to_string()]);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_table_fetch_failure_is_distinct_from_loading() {
        let mut console = QueryConsole::new();
        let ticket = console.open_table("orders".to_string()).ticket();

        console.complete(Completion::TableFetched {
            ticket,
            result: Err(ServiceError::Status {
                status: 400,
                message: "Only SELECT queries are allowed".to_string(),
            }),
        });

        let state = console.state();
        assert!(state.is_table_modal_open());
        assert_eq!(
            state.table_status,
            Some(TableFetchStatus::Failed("Only SELECT queries are allowed".to_string()))
        );
        assert_eq!(
            state.alert.as_deref(),
            Some("Failed to load table orders: Only SELECT queries are allowed")
        );
    }

    #[test]
    fn test_reexecution_replaces_rows_in_place() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");

        console.handle(UiEvent::SqlEdited("SELECT id FROM users".to_string()));
        let command = console.handle(UiEvent::SqlExecuted).unwrap();
        assert_eq!(
            command,
            Command::ExecuteSql {
                ticket: command.ticket(),
                sql: "SELECT id FROM users".to_string()
            }
        );
        assert_eq!(console.state().phase, Phase::AwaitingExecution);

        console.complete(Completion::Executed {
            ticket: command.ticket(),
            result: Ok(ExecuteQueryResponse {
                query_result: Some(rows_result(&["id"], vec![vec![json!(1)], vec![json!(2)]])),
            }),
        });

        let state = console.state();
        assert!(state.is_result_modal_open());
        assert_eq!(state.result_rows.len(), 2);
        assert_eq!(state.generated_sql, "SELECT count(*) FROM users");
        assert_eq!(state.editable_sql, "SELECT id FROM users");
    }

    #[test]
    fn test_failed_reexecution_keeps_prior_rows() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");

        let ticket = console.handle(UiEvent::SqlExecuted).unwrap().ticket();
        console.complete(Completion::Executed {
            ticket,
            result: Ok(ExecuteQueryResponse {
                query_result: Some(QueryResult {
                    columns: vec![],
                    results: None,
                    error: Some("syntax error at or near \"SELEC\"".to_string()),
                }),
            }),
        });

        let state = console.state();
        assert_eq!(state.result_rows, vec![vec![json!(3)]]);
        assert_eq!(
            state.alert.as_deref(),
            Some("Failed to execute query: syntax error at or near \"SELEC\"")
        );
    }

    #[test]
    fn test_execution_requires_open_result_modal() {
        let mut console = QueryConsole::new();
        console.handle(UiEvent::SqlEdited("SELECT 1".to_string()));
        assert_eq!(console.handle(UiEvent::SqlExecuted), None);
        assert!(console.state().editable_sql.is_empty());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut console = QueryConsole::new();
        let first = submit(&mut console, "first question").ticket();
        let second = submit(&mut console, "second question").ticket();
        assert_ne!(first, second);

        assert_eq!(generated(&mut console, second, "SELECT 2"), Applied::Applied);
        assert_eq!(generated(&mut console, first, "SELECT 1"), Applied::Stale);
        assert_eq!(console.state().generated_sql, "SELECT 2");
    }

    #[test]
    fn test_table_click_supersedes_pending_generation() {
        let mut console = QueryConsole::new();
        let generation = submit(&mut console, "question").ticket();
        let fetch = console.open_table("users".to_string()).ticket();

        assert_eq!(generated(&mut console, generation, "SELECT 1"), Applied::Stale);
        assert!(console.state().is_table_modal_open());
        assert_eq!(console.in_flight(Slot::TableFetch), Some(fetch));
        assert_eq!(console.in_flight(Slot::Generation), None);
    }

    #[test]
    fn test_failed_question_keeps_pending_table_fetch() {
        let mut console = QueryConsole::new();
        let fetch = console.open_table("orders".to_string()).ticket();
        let generation = submit(&mut console, "question").ticket();
        assert_eq!(console.state().phase, Phase::AwaitingGeneration);

        let applied = console.complete(Completion::Generated {
            ticket: generation,
            result: Err(ServiceError::Transport("connection refused".to_string())),
        });
        assert_eq!(applied, Applied::Applied);
        assert_eq!(console.state().phase, Phase::AwaitingTableFetch);

        let applied = console.complete(Completion::TableFetched {
            ticket: fetch,
            result: Ok(ExecuteQueryResponse {
                query_result: Some(rows_result(&["id"], vec![vec![json!(1)]])),
            }),
        });
        assert_eq!(applied, Applied::Applied);

        let state = console.state();
        assert!(state.is_table_modal_open());
        assert_eq!(state.table_status, Some(TableFetchStatus::Loaded));
        assert_eq!(state.result_rows, vec![vec![json!(1)]]);
        assert_eq!(state.phase, Phase::Idle);
        assert!(!console.is_busy());
    }

    #[test]
    fn test_failed_question_keeps_pending_reexecution() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");

        console.handle(UiEvent::SqlEdited("SELECT id FROM users".to_string()));
        let execution = console.handle(UiEvent::SqlExecuted).unwrap().ticket();
        let generation = submit(&mut console, "unanswerable").ticket();

        console.complete(Completion::Generated {
            ticket: generation,
            result: Ok(GenerateSqlResponse {
                sql: Some("SELECT 1".to_string()),
                query_result: None,
            }),
        });
        assert_eq!(console.state().phase, Phase::Error);

        let applied = console.complete(Completion::Executed {
            ticket: execution,
            result: Ok(ExecuteQueryResponse {
                query_result: Some(rows_result(&["id"], vec![vec![json!(1)], vec![json!(2)]])),
            }),
        });
        assert_eq!(applied, Applied::Applied);
        assert!(console.state().is_result_modal_open());
        assert_eq!(console.state().result_rows.len(), 2);
    }

    #[test]
    fn test_new_results_discard_pending_fetch_and_reexecution() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");
        let execution = console.handle(UiEvent::SqlExecuted).unwrap().ticket();

        let generation = submit(&mut console, "count orders").ticket();
        assert_eq!(generated(&mut console, generation, "SELECT count(*) FROM orders"), Applied::Applied);
        let applied = console.complete(Completion::Executed {
            ticket: execution,
            result: Ok(ExecuteQueryResponse::default()),
        });
        assert_eq!(applied, Applied::Stale);
        assert_eq!(console.state().generated_sql, "SELECT count(*) FROM orders");

        let fetch = console.open_table("orders".to_string()).ticket();
        let generation = submit(&mut console, "count users again").ticket();
        generated(&mut console, generation, "SELECT count(*) FROM users");
        let applied = console.complete(Completion::TableFetched {
            ticket: fetch,
            result: Ok(ExecuteQueryResponse::default()),
        });
        assert_eq!(applied, Applied::Stale);
        assert!(console.state().is_result_modal_open());
        assert_eq!(console.state().table_status, None);
        assert!(!console.is_busy());
    }

    #[test]
    fn test_closing_table_modal_discards_pending_fetch() {
        let mut console = QueryConsole::new();
        let ticket = console.open_table("users".to_string()).ticket();
        console.handle(UiEvent::TableModalClosed);

        let state = console.state();
        assert_eq!(state.modal, ActiveModal::None);
        assert_eq!(state.selected_table, None);
        assert_eq!(state.table_status, None);
        assert_eq!(state.phase, Phase::Idle);

        let applied = console.complete(Completion::TableFetched {
            ticket,
            result: Ok(ExecuteQueryResponse {
                query_result: Some(rows_result(&["id"], vec![vec![json!(1)]])),
            }),
        });
        assert_eq!(applied, Applied::Stale);
        assert!(console.state().result_rows.is_empty());
    }

    #[test]
    fn test_modals_are_mutually_exclusive() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");
        assert!(console.state().is_result_modal_open());

        console.handle(UiEvent::NodeClicked("users".to_string()));
        let state = console.state();
        assert!(state.is_table_modal_open());
        assert!(state.generated_sql.is_empty());
        assert!(state.result_rows.is_empty());

        // Closing a modal that is not open changes nothing
        console.handle(UiEvent::ResultModalClosed);
        assert!(console.state().is_table_modal_open());
    }

    #[test]
    fn test_closing_result_modal_clears_its_fields() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "count users").ticket();
        generated(&mut console, ticket, "SELECT count(*) FROM users");

        console.handle(UiEvent::ResultModalClosed);
        let state = console.state();
        assert_eq!(state.modal, ActiveModal::None);
        assert!(state.generated_sql.is_empty());
        assert!(state.editable_sql.is_empty());
        assert!(state.result_columns.is_empty());
        // The question stays in the box
        assert_eq!(state.free_text_query, "count users");
    }

    #[test]
    fn test_mismatched_completion_kind_is_stale() {
        let mut console = QueryConsole::new();
        let ticket = submit(&mut console, "question").ticket();
        let applied = console.complete(Completion::Executed {
            ticket,
            result: Ok(ExecuteQueryResponse::default()),
        });
        assert_eq!(applied, Applied::Stale);
        assert_eq!(console.in_flight(Slot::Generation), Some(ticket));
    }
}
