//! Query console
//!
//! The session state document and the state machine that owns it.

pub mod machine;
pub mod state;

pub use machine::{
    quote_identifier, select_all_sql, Applied, Command, Completion, QueryConsole, Slot, Ticket, UiEvent,
};
pub use state::{
    ActiveModal, Phase, SessionState, TableFetchStatus, EMPTY_QUERY_MESSAGE, GENERATION_FAILED_MESSAGE,
};
