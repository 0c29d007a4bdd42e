//! Data structures for layout input options and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::{GraphEdge, GraphNode};
use crate::Error;

/// Default gap between neighbouring nodes of the same rank
pub const DEFAULT_NODE_GAP: f64 = 150.0;

/// Default gap between consecutive ranks
pub const DEFAULT_RANK_GAP: f64 = 150.0;

/// Direction in which ranks advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks are columns, edges point right ("LR")
    #[default]
    LeftToRight,
    /// Ranks are rows, edges point down ("TB")
    TopToBottom,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftToRight),
            "TB" | "TD" => Ok(Self::TopToBottom),
            other => Err(Error::Config(format!(
                "unknown layout direction '{}' (expected LR or TB)",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftToRight => formatter.write_str("LR"),
            Self::TopToBottom => formatter.write_str("TB"),
        }
    }
}

/// Layout parameters (layout units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    /// Gap between nodes within one rank
    pub node_gap: f64,
    /// Gap between ranks
    pub rank_gap: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::LeftToRight,
            node_gap: DEFAULT_NODE_GAP,
            rank_gap: DEFAULT_RANK_GAP,
        }
    }
}

/// Top-left corner of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node with its computed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub node: GraphNode,
    pub position: Position,
    /// Layer index along the layout direction (0 when unlaid-out)
    pub rank: usize,
    /// The layout is a starting point; renderers let users move nodes
    pub draggable: bool,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }
}

/// Whether positions came from the layered layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStatus {
    LaidOut,
    /// The input could not be laid out; every node sits at the origin
    Unlaid { reason: String },
}

/// The complete layout result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedGraph {
    pub nodes: Vec<PositionedNode>,
    /// Edges whose endpoints both exist, in input order
    pub edges: Vec<GraphEdge>,
    pub status: LayoutStatus,
    /// Bounding box of all nodes, anchored at the origin
    pub width: f64,
    pub height: f64,
    /// Number of input edges dropped for referencing unknown nodes
    pub dropped_edges: usize,
}

impl PositionedGraph {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            status: LayoutStatus::LaidOut,
            width: 0.0,
            height: 0.0,
            dropped_edges: 0,
        }
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn is_laid_out(&self) -> bool {
        self.status == LayoutStatus::LaidOut
    }
}
