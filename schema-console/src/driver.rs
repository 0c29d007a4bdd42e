//! ConsoleDriver - event loop integration
//!
//! Owns the [`QueryConsole`] and the positioned graph, issues remote requests
//! as tokio tasks and applies their completions back on the owning task. All
//! state mutation therefore happens in one place; tasks only ever send
//! completions through the channel.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::console::{Applied, Command, Completion, QueryConsole, SessionState, Ticket, UiEvent};
use crate::graph::SchemaGraph;
use crate::layout::{LayoutEngine, LayoutOptions, PositionedGraph};
use crate::service::QueryService;
use crate::Result;

/// Drives a [`QueryConsole`] against a [`QueryService`]
///
/// # Example
///
/// ```rust,no_run
/// use schema_console::{ConsoleDriver, HttpQueryService, LayoutOptions, UiEvent};
///
/// # async fn example() -> schema_console::Result<()> {
/// let service = HttpQueryService::new("http://localhost:5001")?;
/// let mut driver = ConsoleDriver::new(service, LayoutOptions::default());
/// driver.load_schema().await?;
///
/// driver.dispatch(UiEvent::NodeClicked("orders".to_string()));
/// driver.next_completion().await;
/// # Ok(())
/// # }
/// ```
pub struct ConsoleDriver<S: QueryService> {
    service: Arc<S>,
    engine: LayoutEngine,
    console: QueryConsole,
    schema: SchemaGraph,
    graph: PositionedGraph,
    sender: mpsc::UnboundedSender<Completion>,
    receiver: mpsc::UnboundedReceiver<Completion>,
    outstanding: usize,
}

impl<S: QueryService> ConsoleDriver<S> {
    pub fn new(service: S, options: LayoutOptions) -> Self {
        Self::with_shared(Arc::new(service), options)
    }

    /// Create a driver around a service shared with other owners
    pub fn with_shared(service: Arc<S>, options: LayoutOptions) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            service,
            engine: LayoutEngine::new(options),
            console: QueryConsole::new(),
            schema: SchemaGraph::default(),
            graph: PositionedGraph::empty(),
            sender,
            receiver,
            outstanding: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        self.console.state()
    }

    pub fn console(&self) -> &QueryConsole {
        &self.console
    }

    /// The graph as currently laid out
    pub fn graph(&self) -> &PositionedGraph {
        &self.graph
    }

    /// Requests issued whose completions have not been received yet
    ///
    /// Superseded requests still count until their (stale) response arrives.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Fetch the schema and lay it out from scratch
    ///
    /// On failure the graph is cleared and an alert is raised; the console
    /// stays usable.
    pub async fn load_schema(&mut self) -> Result<()> {
        let loaded = match self.service.fetch_schema().await {
            Ok(document) => SchemaGraph::from_value(document),
            Err(error) => Err(error.into()),
        };

        match loaded {
            Ok(schema) => {
                info!(
                    tables = schema.nodes.len(),
                    foreign_keys = schema.edges.len(),
                    "Loaded schema"
                );
                self.set_schema(schema);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "Failed to load schema");
                self.set_schema(SchemaGraph::default());
                self.console.raise_alert(format!("Failed to load schema: {}", error));
                Err(error)
            }
        }
    }

    /// Replace the schema snapshot and re-run the layout
    pub fn set_schema(&mut self, schema: SchemaGraph) {
        self.schema = schema;
        self.relayout();
    }

    pub fn layout_options(&self) -> LayoutOptions {
        *self.engine.options()
    }

    /// Change layout options (e.g. direction) and re-run the layout
    pub fn set_layout_options(&mut self, options: LayoutOptions) {
        self.engine = LayoutEngine::new(options);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.graph = self.engine.layout(&self.schema);
    }

    /// Apply a UI event; any resulting request is started immediately
    ///
    /// Returns the ticket of the started request.
    pub fn dispatch(&mut self, event: UiEvent) -> Option<Ticket> {
        let command = self.console.handle(event)?;
        let ticket = command.ticket();
        self.spawn(command);
        Some(ticket)
    }

    fn spawn(&mut self, command: Command) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        self.outstanding += 1;

        tokio::spawn(async move {
            let completion = perform(service.as_ref(), command).await;
            if sender.send(completion).is_err() {
                debug!("Console driver dropped before request completed");
            }
        });
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` without waiting when nothing is outstanding.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.receiver.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, completion: Completion) -> Applied {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.console.complete(completion)
    }
}

/// Run one command against the service
async fn perform<S: QueryService + ?Sized>(service: &S, command: Command) -> Completion {
    match command {
        Command::GenerateSql { ticket, question } => Completion::Generated {
            ticket,
            result: service.generate_sql(&question).await,
        },
        Command::ExecuteSql { ticket, sql } => Completion::Executed {
            ticket,
            result: service.execute_query(&sql).await,
        },
        Command::FetchTable { ticket, sql, .. } => Completion::TableFetched {
            ticket,
            result: service.execute_query(&sql).await,
        },
    }
}
