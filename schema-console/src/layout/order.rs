//! Ordering within ranks (barycenter crossing minimisation).

use std::cmp::Ordering;

use super::rank::LayeringGraph;

/// Upper bound on forward+backward sweep pairs.
const MAX_SWEEPS: usize = 8;

/// Group nodes into ranks, each rank initially in id order.
pub(super) fn build_rank_buckets(ranks: &[usize], by_id: &[usize]) -> Vec<Vec<usize>> {
    let rank_count = ranks.iter().copied().max().map_or(0, |max| max + 1);
    let mut buckets = vec![Vec::new(); rank_count];
    for &node in by_id {
        buckets[ranks[node]].push(node);
    }
    buckets
}

/// Reorder ranks to reduce crossings. Returns the remaining crossing count.
///
/// Alternates downward and upward barycenter sweeps and keeps the best
/// ordering seen; stops at the first sweep that does not improve.
pub(super) fn minimize_crossings(rank_order: &mut Vec<Vec<usize>>, graph: &LayeringGraph) -> usize {
    if rank_order.len() <= 1 {
        return 0;
    }

    let mut best_crossings = total_crossings(rank_order, graph);
    let mut best_order = rank_order.clone();

    for _ in 0..MAX_SWEEPS {
        if best_crossings == 0 {
            break;
        }

        for rank in 1..rank_order.len() {
            let (fixed, free) = rank_order.split_at_mut(rank);
            reorder_by_barycenter(&mut free[0], &fixed[rank - 1], &graph.predecessors, graph.len());
        }
        for rank in (0..rank_order.len() - 1).rev() {
            let (free, fixed) = rank_order.split_at_mut(rank + 1);
            reorder_by_barycenter(&mut free[rank], &fixed[0], &graph.successors, graph.len());
        }

        let crossings = total_crossings(rank_order, graph);
        if crossings < best_crossings {
            best_crossings = crossings;
            best_order = rank_order.clone();
        } else {
            break;
        }
    }

    *rank_order = best_order;
    best_crossings
}

/// Sort `free` by the mean position of each node's neighbours in `fixed`.
///
/// Nodes without neighbours in `fixed` keep their current slot as barycenter.
fn reorder_by_barycenter(free: &mut [usize], fixed: &[usize], neighbours: &[Vec<usize>], node_count: usize) {
    let mut slot = vec![None; node_count];
    for (index, &node) in fixed.iter().enumerate() {
        slot[node] = Some(index as f64);
    }

    let mut scored: Vec<(f64, usize, usize)> = free
        .iter()
        .enumerate()
        .map(|(current, &node)| {
            let positions: Vec<f64> = neighbours[node].iter().filter_map(|&other| slot[other]).collect();
            let barycenter = if positions.is_empty() {
                current as f64
            } else {
                positions.iter().sum::<f64>() / positions.len() as f64
            };
            (barycenter, current, node)
        })
        .collect();

    // Ties keep their previous relative order
    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));

    for (target, (_, _, node)) in free.iter_mut().zip(scored) {
        *target = node;
    }
}

/// Count crossings between two adjacent ranks.
fn count_crossings(upper: &[usize], lower: &[usize], graph: &LayeringGraph) -> usize {
    let mut slot = vec![None; graph.len()];
    for (index, &node) in lower.iter().enumerate() {
        slot[node] = Some(index);
    }

    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (index, &node) in upper.iter().enumerate() {
        for &next in &graph.successors[node] {
            if let Some(lower_index) = slot[next] {
                segments.push((index, lower_index));
            }
        }
    }

    // Schemas have tens of tables; the quadratic count is fine
    let mut crossings = 0;
    for (i, &(a1, b1)) in segments.iter().enumerate() {
        for &(a2, b2) in &segments[i + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Crossings summed over all adjacent rank pairs.
pub(super) fn total_crossings(rank_order: &[Vec<usize>], graph: &LayeringGraph) -> usize {
    rank_order
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], graph))
        .sum()
}
