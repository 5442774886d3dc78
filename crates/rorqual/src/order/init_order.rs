use rustc_hash::FxHashSet;

use crate::LayoutGraph;

/// Initial layering: leaf nodes visited rank by rank, each one dragging its
/// successors depth-first into their own ranks. Gives a starting order that
/// already keeps connected nodes close.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let simple: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.children(v).is_empty())
        .collect();
    let Some(max_rank) = simple
        .iter()
        .filter_map(|v| g.node(v).and_then(|n| n.rank))
        .max()
    else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];

    let mut ordered = simple;
    ordered.sort_by_key(|v| g.node(v).and_then(|n| n.rank).unwrap_or(0));

    let mut visited: FxHashSet<String> = FxHashSet::default();
    for root in ordered {
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            if !visited.insert(v.clone()) {
                continue;
            }
            if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
                if rank >= 0 && (rank as usize) < layers.len() {
                    layers[rank as usize].push(v.clone());
                }
            }
            let mut next = g.successors(&v);
            next.reverse();
            for w in next {
                if !visited.contains(&w) {
                    stack.push(w);
                }
            }
        }
    }
    layers
}
