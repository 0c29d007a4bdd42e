//! Parsing of console input lines

use schema_console::Direction;

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A natural-language question; blank lines submit an empty one
    Ask(String),
    Open(String),
    /// Replace the editable SQL
    Sql(String),
    Run,
    Close,
    Dismiss,
    Reload,
    Graph,
    Direction(Direction),
    Help,
    Quit,
}

pub const HELP: &str = "\
<question>          ask a question in plain language
:open <table>       inspect the rows of a table
:sql <statement>    replace the SQL shown in the result view
:run                execute the (edited) SQL
:close              close the open view
:dismiss            dismiss the current alert
:reload             fetch the schema again
:graph              print the schema graph
:direction LR|TB    change the layout direction
:help               show this help
:quit               exit";

/// Parse a line; unknown commands produce an error message
pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Ask(line.to_string()));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "open" if !argument.is_empty() => Ok(Input::Open(argument.to_string())),
        "open" => Err("usage: :open <table>".to_string()),
        "sql" => Ok(Input::Sql(argument.to_string())),
        "run" => Ok(Input::Run),
        "close" => Ok(Input::Close),
        "dismiss" => Ok(Input::Dismiss),
        "reload" => Ok(Input::Reload),
        "graph" => Ok(Input::Graph),
        "direction" => argument
            .parse()
            .map(Input::Direction)
            .map_err(|error| format!("{}", error)),
        "help" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command ':{}' (try :help)", other)),
    }
}
