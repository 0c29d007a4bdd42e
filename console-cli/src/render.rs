//! Text rendering of the positioned graph and the console state

use schema_console::{ActiveModal, Phase, PositionedGraph, SessionState, TableFetchStatus};
use serde_json::Value;
use std::fmt::Write;

/// Widest cell printed before truncation
const MAX_CELL_WIDTH: usize = 32;

pub fn render_graph(graph: &PositionedGraph) -> String {
    let mut output = String::new();

    if let schema_console::LayoutStatus::Unlaid { reason } = &graph.status {
        let _ = writeln!(output, "(layout unavailable: {})", reason);
    }
    if graph.nodes.is_empty() {
        output.push_str("(no tables)\n");
        return output;
    }

    let _ = writeln!(
        output,
        "{} tables, {} relationships ({:.0} x {:.0})",
        graph.nodes.len(),
        graph.edges.len(),
        graph.width,
        graph.height
    );

    let mut nodes: Vec<_> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id().cmp(b.id())));

    for node in nodes {
        let _ = writeln!(
            output,
            "[{}] {} @ ({:.0}, {:.0})",
            node.rank,
            node.id(),
            node.position.x,
            node.position.y
        );
        for column in &node.node.table.columns {
            let _ = writeln!(output, "      {} : {}", column.name, column.data_type);
        }
    }

    for edge in &graph.edges {
        match &edge.label {
            Some(label) => {
                let _ = writeln!(output, "  {} -> {} ({})", edge.source, edge.target, label);
            }
            None => {
                let _ = writeln!(output, "  {} -> {}", edge.source, edge.target);
            }
        }
    }
    if graph.dropped_edges > 0 {
        let _ = writeln!(output, "  ({} relationships reference unknown tables)", graph.dropped_edges);
    }

    output
}

pub fn render_state(state: &SessionState) -> String {
    let mut output = String::new();

    match state.phase {
        Phase::AwaitingGeneration => output.push_str("… generating SQL\n"),
        Phase::AwaitingExecution => output.push_str("… executing query\n"),
        Phase::AwaitingTableFetch => output.push_str("… loading table\n"),
        Phase::Idle | Phase::Error => {}
    }
    if let Some(message) = &state.error_message {
        let _ = writeln!(output, "error: {}", message);
    }
    if let Some(alert) = &state.alert {
        let _ = writeln!(output, "!! {} (:dismiss)", alert);
    }

    match state.modal {
        ActiveModal::None => {}
        ActiveModal::QueryResult => {
            output.push_str("== Query Results ==\n");
            let _ = writeln!(output, "Generated SQL:\n  {}", state.generated_sql);
            if state.editable_sql != state.generated_sql {
                let _ = writeln!(output, "Edited SQL:\n  {}", state.editable_sql);
            }
            output.push_str(&render_rows(&state.result_columns, &state.result_rows));
        }
        ActiveModal::TableInspection => {
            let table = state.selected_table.as_deref().unwrap_or_default();
            let _ = writeln!(output, "== Table: {} ==", table);
            match &state.table_status {
                Some(TableFetchStatus::Loading) | None => output.push_str("Loading…\n"),
                Some(TableFetchStatus::Failed(message)) => {
                    let _ = writeln!(output, "Could not load rows: {}", message);
                }
                Some(TableFetchStatus::Loaded) => {
                    output.push_str(&render_rows(&state.result_columns, &state.result_rows));
                }
            }
        }
    }

    output
}

/// Render rows as an aligned text table
///
/// Without column names the header falls back to `Column N`.
pub fn render_rows(columns: &[String], rows: &[Vec<Value>]) -> String {
    if rows.is_empty() {
        return "No results found.\n".to_string();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(columns.len());
    let header: Vec<String> = (0..width)
        .map(|index| {
            columns
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("Column {}", index + 1))
        })
        .collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| (0..width).map(|index| row.get(index).map(cell_text).unwrap_or_default()).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|name| name.chars().count()).collect();
    for row in &body {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_row(&mut output, &separator, &widths);
    for row in &body {
        push_row(&mut output, row, &widths);
    }
    let _ = writeln!(output, "({} rows)", rows.len());
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    output.push_str(padded.join(" | ").trim_end());
    output.push('\n');
}

fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => "NULL".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", truncated)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_console::{GraphEdge, GraphNode, LayoutEngine, SchemaGraph};
    use serde_json::json;

    #[test]
    fn test_render_rows_with_names() {
        let text = render_rows(
            &["id".to_string(), "name".to_string()],
            &[vec![json!(1), json!("Ada")], vec![json!(2), Value::Null]],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "-- | ----");
        assert_eq!(lines[2], "1  | Ada");
        assert_eq!(lines[3], "2  | NULL");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_render_rows_without_names() {
        let text = render_rows(&[], &[vec![json!(1), json!(true)]]);
        assert!(text.starts_with("Column 1 | Column 2"));
    }

    #[test]
    fn test_render_empty_rows() {
        assert_eq!(render_rows(&["id".to_string()], &[]), "No results found.\n");
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let text = cell_text(&json!("x".repeat(100)));
        assert_eq!(text.chars().count(), MAX_CELL_WIDTH);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn test_render_graph() {
        let graph = SchemaGraph {
            nodes: vec![
                GraphNode::from_table("users", vec![]),
                GraphNode::from_table("orders", vec![]),
            ],
            edges: vec![GraphEdge::between("orders", "users")],
        };
        let text = render_graph(&LayoutEngine::default().layout(&graph));

        assert!(text.contains("2 tables, 1 relationships"));
        assert!(text.contains("[0] orders @ (0, 0)"));
        assert!(text.contains("[1] users @ (370, 0)"));
        assert!(text.contains("  orders -> users"));
    }

    #[test]
    fn test_render_table_modal_failure() {
        let state = SessionState {
            modal: ActiveModal::TableInspection,
            selected_table: Some("orders".to_string()),
            table_status: Some(TableFetchStatus::Failed("timeout".to_string())),
            ..SessionState::default()
        };
        let text = render_state(&state);
        assert!(text.contains("== Table: orders =="));
        assert!(text.contains("Could not load rows: timeout"));
        assert!(!text.contains("Loading"));
    }
}
