//! Layered layout for schema graphs
//!
//! A Sugiyama-style pipeline:
//!   1. Validation (duplicate ids fall back to an unlaid-out graph, dangling edges are dropped)
//!   2. Cycle breaking (back-edges reversed, self-loops ignored)
//!   3. Rank assignment (longest path from sources)
//!   4. Ordering within ranks (barycenter crossing minimisation)
//!   5. Coordinate assignment (centroids translated to top-left corners)
//!
//! Layout is a pure function of its input: identical graphs produce identical
//! positions, independent of the order nodes arrive in.

mod coordinates;
mod order;
mod rank;
mod types;

pub use types::{
    Direction, LayoutOptions, LayoutStatus, Position, PositionedGraph, PositionedNode, DEFAULT_NODE_GAP,
    DEFAULT_RANK_GAP,
};

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::graph::{GraphEdge, SchemaGraph, Size};

/// Computes node positions for a [`SchemaGraph`].
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out `graph`, producing a new positioned graph.
    ///
    /// Never fails: duplicate node ids yield [`LayoutStatus::Unlaid`] with every
    /// node at the origin, and edges referencing unknown nodes are left out.
    pub fn layout(&self, graph: &SchemaGraph) -> PositionedGraph {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
        let mut duplicate = None;
        for (position, node) in graph.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), position).is_some() {
                duplicate = Some(node.id.clone());
            }
        }

        let (edges, dropped_edges) = retain_known_edges(&graph.edges, |id| index.contains_key(id));
        if dropped_edges > 0 {
            warn!(dropped_edges, "Dropping edges that reference unknown tables");
        }

        if let Some(id) = duplicate {
            warn!(node = %id, "Duplicate node id, skipping layout");
            return unlaid(graph, edges, dropped_edges, format!("duplicate node id '{}'", id));
        }

        let node_count = graph.nodes.len();
        let mut by_id: Vec<usize> = (0..node_count).collect();
        by_id.sort_by(|&a, &b| graph.nodes[a].id.cmp(&graph.nodes[b].id));

        let arcs: Vec<(usize, usize)> = edges
            .iter()
            .map(|edge| (index[edge.source.as_str()], index[edge.target.as_str()]))
            .collect();

        let layering = rank::break_cycles(node_count, &arcs, &by_id);
        let ranks = rank::assign_ranks(&layering, &by_id);

        let mut rank_order = order::build_rank_buckets(&ranks, &by_id);
        let crossings = order::minimize_crossings(&mut rank_order, &layering);

        let sizes: Vec<Size> = graph.nodes.iter().map(|node| node.size).collect();
        let placement = coordinates::assign_coordinates(&rank_order, &sizes, &self.options);

        debug!(
            nodes = node_count,
            edges = edges.len(),
            ranks = rank_order.len(),
            crossings,
            direction = %self.options.direction,
            "Laid out schema graph"
        );

        let nodes = graph
            .nodes
            .iter()
            .zip(placement.positions)
            .zip(ranks)
            .map(|((node, position), rank)| PositionedNode {
                node: node.clone(),
                position,
                rank,
                draggable: true,
            })
            .collect();

        PositionedGraph {
            nodes,
            edges,
            status: LayoutStatus::LaidOut,
            width: placement.width,
            height: placement.height,
            dropped_edges,
        }
    }
}

/// Split edges into those whose endpoints exist and a count of the rest.
fn retain_known_edges(edges: &[GraphEdge], exists: impl Fn(&str) -> bool) -> (Vec<GraphEdge>, usize) {
    let kept: Vec<GraphEdge> = edges
        .iter()
        .filter(|edge| exists(&edge.source) && exists(&edge.target))
        .cloned()
        .collect();
    let dropped = edges.len() - kept.len();
    (kept, dropped)
}

fn unlaid(graph: &SchemaGraph, edges: Vec<GraphEdge>, dropped_edges: usize, reason: String) -> PositionedGraph {
    PositionedGraph {
        nodes: graph
            .nodes
            .iter()
            .map(|node| PositionedNode {
                node: node.clone(),
                position: Position::default(),
                rank: 0,
                draggable: true,
            })
            .collect(),
        edges,
        status: LayoutStatus::Unlaid { reason },
        width: 0.0,
        height: 0.0,
        dropped_edges,
    }
}
