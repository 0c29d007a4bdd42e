//! Schema adapter
//!
//! Turns raw schema metadata into generic node/edge descriptors for the layout engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{ColumnInfo, ForeignKey, RawSchema};
use crate::{Error, Result};

/// Width shared by every table node
pub const NODE_WIDTH: f64 = 220.0;

/// Height of a node with no columns (title row and padding)
pub const NODE_BASE_HEIGHT: f64 = 40.0;

/// Height added per column so labels do not overlap
pub const COLUMN_HEIGHT: f64 = 20.0;

/// Height of a table node with `column_count` columns
pub fn node_height(column_count: usize) -> f64 {
    NODE_BASE_HEIGHT + column_count as f64 * COLUMN_HEIGHT
}

/// One relational table's name and columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// Node dimensions in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A table as a graph node, before layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Table name
    pub id: String,
    pub size: Size,
    pub table: TableDescriptor,
}

impl GraphNode {
    pub fn from_table(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            size: Size {
                width: NODE_WIDTH,
                height: node_height(columns.len()),
            },
            table: TableDescriptor { name, columns },
        }
    }
}

/// A foreign key as a directed edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `e{source}-{target}`
    pub id: String,
    pub source: String,
    pub target: String,

    /// `source_column → target_column` when the service reports key columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
            label: None,
        }
    }
}

impl From<&ForeignKey> for GraphEdge {
    fn from(foreign_key: &ForeignKey) -> Self {
        let mut edge = GraphEdge::between(&foreign_key.source_table, &foreign_key.target_table);
        if let (Some(from), Some(to)) = (&foreign_key.source_column, &foreign_key.target_column) {
            edge.label = Some(format!("{} → {}", from, to));
        }
        edge
    }
}

/// Edge identifier for a (source, target) pair
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e{}-{}", source, target)
}

/// Nodes and edges of one schema snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl SchemaGraph {
    /// Build one node per table and one edge per foreign key.
    ///
    /// Nothing is deduplicated. Edges whose endpoints are not tables in this
    /// snapshot are kept here; the layout engine drops them.
    pub fn from_schema(schema: &RawSchema) -> Self {
        let nodes = schema
            .tables
            .iter()
            .map(|(name, columns)| GraphNode::from_table(name, columns.clone()))
            .collect();

        let edges = schema.foreign_keys.iter().map(GraphEdge::from).collect();

        Self { nodes, edges }
    }

    /// Build a graph from an untyped schema payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSchema`] when the `tables` mapping is missing or
    /// the payload does not match the schema shape.
    pub fn from_value(value: Value) -> Result<Self> {
        match value.get("tables") {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(Error::MalformedSchema(
                    "`tables` is not a mapping".to_string(),
                ))
            }
            None => return Err(Error::MalformedSchema("missing `tables`".to_string())),
        }

        let schema: RawSchema = serde_json::from_value(value)
            .map_err(|error| Error::MalformedSchema(error.to_string()))?;

        Ok(Self::from_schema(&schema))
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
