//! Coordinate assignment.

use super::types::{Direction, LayoutOptions, Position};
use crate::graph::Size;

/// Result of placing ranked, ordered nodes on the plane.
pub(super) struct Placement {
    /// Top-left corner per node index
    pub positions: Vec<Position>,
    pub width: f64,
    pub height: f64,
}

/// Place nodes and translate centroids to top-left corners.
///
/// Ranks advance along the direction axis, separated by `rank_gap` and as deep
/// as their deepest node. Within a rank, nodes are separated by `node_gap` and
/// every rank is centred on the widest one. The drawing starts at the origin.
pub(super) fn assign_coordinates(rank_order: &[Vec<usize>], sizes: &[Size], options: &LayoutOptions) -> Placement {
    // (along the rank axis, across it)
    let extent = |size: &Size| match options.direction {
        Direction::TopToBottom => (size.height, size.width),
        Direction::LeftToRight => (size.width, size.height),
    };

    let rank_breadths: Vec<f64> = rank_order
        .iter()
        .map(|nodes| {
            let sum: f64 = nodes.iter().map(|&node| extent(&sizes[node]).1).sum();
            sum + nodes.len().saturating_sub(1) as f64 * options.node_gap
        })
        .collect();
    let max_breadth = rank_breadths.iter().copied().fold(0.0_f64, f64::max);

    let mut positions = vec![Position::default(); sizes.len()];
    let mut depth_cursor = 0.0_f64;

    for (rank, nodes) in rank_order.iter().enumerate() {
        let rank_depth = nodes
            .iter()
            .map(|&node| extent(&sizes[node]).0)
            .fold(0.0_f64, f64::max);
        let depth_center = depth_cursor + rank_depth / 2.0;

        let mut breadth_cursor = (max_breadth - rank_breadths[rank]) / 2.0;
        for &node in nodes {
            let breadth = extent(&sizes[node]).1;
            let breadth_center = breadth_cursor + breadth / 2.0;
            breadth_cursor += breadth + options.node_gap;

            let (center_x, center_y) = match options.direction {
                Direction::TopToBottom => (breadth_center, depth_center),
                Direction::LeftToRight => (depth_center, breadth_center),
            };
            let size = sizes[node];
            positions[node] = Position {
                x: center_x - size.width / 2.0,
                y: center_y - size.height / 2.0,
            };
        }

        depth_cursor += rank_depth + options.rank_gap;
    }

    let total_depth = (depth_cursor - options.rank_gap).max(0.0);
    let (width, height) = match options.direction {
        Direction::TopToBottom => (max_breadth, total_depth),
        Direction::LeftToRight => (total_depth, max_breadth),
    };

    Placement {
        positions,
        width,
        height,
    }
}
