use schema_console::{
    ActiveModal, ConsoleConfig, ConsoleDriver, HttpQueryService, LayoutOptions, UiEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{parse_line, Input, HELP};
use render::{render_graph, render_state};

enum Event {
    Line(std::io::Result<Option<String>>),
    Completed,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they do not interleave with rendered output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        error!(%error, "Console exited with an error");
        std::process::exit(1);
    }
}

async fn run() -> schema_console::Result<()> {
    let config = ConsoleConfig::from_env()?;
    let service = HttpQueryService::new(&config.service_url)?;
    let mut driver = ConsoleDriver::new(service, config.layout_options());

    info!(service_url = %config.service_url, direction = %config.direction, "Starting console");

    // A failed load is shown as an alert; the console keeps running
    if driver.load_schema().await.is_ok() {
        print!("{}", render_graph(driver.graph()));
    }
    print!("{}", render_state(driver.state()));
    println!("Type a question, or :help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line),
            Some(applied) = driver.next_completion(), if driver.outstanding() > 0 => {
                debug!(?applied, "Applied completion");
                Event::Completed
            }
        };

        match event {
            Event::Completed => print!("{}", render_state(driver.state())),
            Event::Line(Ok(None)) => break,
            Event::Line(Err(error)) => {
                error!(%error, "Failed to read input");
                break;
            }
            Event::Line(Ok(Some(line))) => match parse_line(&line) {
                Ok(Input::Quit) => break,
                Ok(input) => handle_input(&mut driver, input).await,
                Err(message) => println!("{}", message),
            },
        }
    }

    Ok(())
}

async fn handle_input(driver: &mut ConsoleDriver<HttpQueryService>, input: Input) {
    match input {
        Input::Ask(question) => {
            driver.dispatch(UiEvent::QueryEdited(question));
            driver.dispatch(UiEvent::QuerySubmitted);
        }
        Input::Open(table) => {
            if driver.graph().node(&table).is_none() {
                println!("unknown table '{}'", table);
                return;
            }
            driver.dispatch(UiEvent::NodeClicked(table));
        }
        Input::Sql(sql) => {
            driver.dispatch(UiEvent::SqlEdited(sql));
        }
        Input::Run => {
            if !driver.state().is_result_modal_open() {
                println!("nothing to run; ask a question first");
                return;
            }
            driver.dispatch(UiEvent::SqlExecuted);
        }
        Input::Close => {
            let event = match driver.state().modal {
                ActiveModal::QueryResult => UiEvent::ResultModalClosed,
                ActiveModal::TableInspection => UiEvent::TableModalClosed,
                ActiveModal::None => return,
            };
            driver.dispatch(event);
        }
        Input::Dismiss => {
            driver.dispatch(UiEvent::AlertDismissed);
        }
        Input::Reload => {
            if driver.load_schema().await.is_ok() {
                print!("{}", render_graph(driver.graph()));
            }
        }
        Input::Graph => {
            print!("{}", render_graph(driver.graph()));
            return;
        }
        Input::Direction(direction) => {
            let options = LayoutOptions {
                direction,
                ..driver.layout_options()
            };
            driver.set_layout_options(options);
            print!("{}", render_graph(driver.graph()));
            return;
        }
        Input::Help => {
            println!("{}", HELP);
            return;
        }
        Input::Quit => return,
    }

    print!("{}", render_state(driver.state()));
}
