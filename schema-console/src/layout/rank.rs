//! Cycle breaking and rank assignment.

/// Adjacency lists over node indices, free of cycles and self-loops.
pub(super) struct LayeringGraph {
    /// Forward arcs: successors[u] = v where u → v
    pub successors: Vec<Vec<usize>>,
    /// Reverse arcs: predecessors[v] = u where u → v
    pub predecessors: Vec<Vec<usize>>,
}

impl LayeringGraph {
    pub fn len(&self) -> usize {
        self.successors.len()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Build an acyclic layering graph from directed arcs.
///
/// `by_id` lists node indices in id order; traversal follows that order so the
/// set of reversed arcs only depends on ids. Self-loops are ignored and arcs
/// closing a cycle are reversed. Parallel arcs collapse into one.
pub(super) fn break_cycles(node_count: usize, arcs: &[(usize, usize)], by_id: &[usize]) -> LayeringGraph {
    let mut id_rank = vec![0usize; node_count];
    for (position, &node) in by_id.iter().enumerate() {
        id_rank[node] = position;
    }

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(source, target) in arcs {
        if source != target {
            outgoing[source].push(target);
        }
    }
    for list in &mut outgoing {
        list.sort_by_key(|&node| id_rank[node]);
        list.dedup();
    }

    let mut state = vec![Visit::New; node_count];
    let mut acyclic: Vec<(usize, usize)> = Vec::with_capacity(arcs.len());

    for &root in by_id {
        if state[root] != Visit::New {
            continue;
        }
        state[root] = Visit::Active;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if cursor < outgoing[node].len() {
                frame.1 += 1;
                let next = outgoing[node][cursor];
                match state[next] {
                    Visit::New => {
                        acyclic.push((node, next));
                        state[next] = Visit::Active;
                        stack.push((next, 0));
                    }
                    // Back-edge: reverse it
                    Visit::Active => acyclic.push((next, node)),
                    Visit::Done => acyclic.push((node, next)),
                }
            } else {
                state[node] = Visit::Done;
                stack.pop();
            }
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (source, target) in acyclic {
        successors[source].push(target);
        predecessors[target].push(source);
    }
    for list in successors.iter_mut().chain(predecessors.iter_mut()) {
        list.sort_by_key(|&node| id_rank[node]);
        list.dedup();
    }

    LayeringGraph {
        successors,
        predecessors,
    }
}

/// Longest-path layering.
///
/// Sources get rank 0; every other node gets one more than its highest-ranked
/// predecessor, so every arc points from a lower to a higher rank.
pub(super) fn assign_ranks(graph: &LayeringGraph, by_id: &[usize]) -> Vec<usize> {
    let node_count = graph.len();
    let mut in_degree: Vec<usize> = graph.predecessors.iter().map(Vec::len).collect();
    let mut ranks = vec![0usize; node_count];

    // Kahn's algorithm, seeded in id order
    let mut queue: Vec<usize> = by_id
        .iter()
        .copied()
        .filter(|&node| in_degree[node] == 0)
        .collect();
    let mut head = 0;

    while head < queue.len() {
        let node = queue[head];
        head += 1;

        for &next in &graph.successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push(next);
            }
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(count: usize) -> Vec<usize> {
        (0..count).collect()
    }

    #[test]
    fn test_chain_ranks() {
        let by_id = identity(3);
        let graph = break_cycles(3, &[(0, 1), (1, 2)], &by_id);
        assert_eq!(assign_ranks(&graph, &by_id), vec![0, 1, 2]);
    }

    #[test]
    fn test_longest_path_wins() {
        // 0 → 1 → 2 and 0 → 2: node 2 sits below node 1
        let by_id = identity(3);
        let graph = break_cycles(3, &[(0, 1), (1, 2), (0, 2)], &by_id);
        assert_eq!(assign_ranks(&graph, &by_id), vec![0, 1, 2]);
    }

    #[test]
    fn test_mutual_references_are_ranked() {
        let by_id = identity(2);
        let graph = break_cycles(2, &[(0, 1), (1, 0)], &by_id);
        assert_eq!(graph.successors[0], vec![1]);
        assert!(graph.successors[1].is_empty());
        assert_eq!(assign_ranks(&graph, &by_id), vec![0, 1]);
    }

    #[test]
    fn test_self_loop_is_ignored() {
        let by_id = identity(1);
        let graph = break_cycles(1, &[(0, 0)], &by_id);
        assert!(graph.successors[0].is_empty());
        assert_eq!(assign_ranks(&graph, &by_id), vec![0]);
    }

    #[test]
    fn test_three_cycle_gets_distinct_ranks() {
        let by_id = identity(3);
        let graph = break_cycles(3, &[(0, 1), (1, 2), (2, 0)], &by_id);
        let ranks = assign_ranks(&graph, &by_id);
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_id_order_drives_cycle_breaking() {
        // Same cycle, node 1 first in id order: the traversal starts there
        let by_id = vec![1, 0];
        let graph = break_cycles(2, &[(0, 1), (1, 0)], &by_id);
        assert_eq!(assign_ranks(&graph, &by_id), vec![1, 0]);
    }
}
