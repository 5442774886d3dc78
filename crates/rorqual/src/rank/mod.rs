//! Rank assignment: every node gets an integer layer index such that
//! `rank(w) - rank(v) >= minlen(v, w)` for every edge.
//!
//! The structure follows Gansner et al., "A Technique for Drawing Directed
//! Graphs": longest-path initialization, optionally refined by a tight
//! spanning tree or the full network simplex.

pub mod feasible_tree;
pub mod network_simplex;

use rustc_hash::{FxHashMap, FxHashSet};

use rorqual_graphlib::EdgeKey;

use crate::LayoutGraph;
use crate::model::Ranker;

/// Assigns ranks according to the configured strategy. Preconditions: the
/// graph is a connected DAG and every edge carries `weight` and `minlen`.
/// Ranks may start anywhere (including below zero); normalization happens
/// later.
pub fn rank(g: &mut LayoutGraph) {
    match g.graph().ranker {
        Ranker::LongestPath => longest_path(g),
        Ranker::TightTree => {
            longest_path(g);
            feasible_tree::feasible_tree(g);
        }
        Ranker::NetworkSimplex => network_simplex::network_simplex(g),
    }
}

pub(crate) fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).and_then(|n| n.rank).unwrap_or(0)
}

/// Difference between an edge's span and its minimum length. Zero means the
/// edge is tight; a valid ranking never has negative slack.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let minlen = g.edge_by_key(e).map(|label| label.minlen).unwrap_or(1);
    rank_of(g, &e.w) - rank_of(g, &e.v) - minlen
}

/// Longest-path initialization: pushes every node to the lowest rank allowed
/// by its out-edges, sinks landing at 0. Fast but leaves edges longer than
/// necessary; meant to seed the other rankers.
pub fn longest_path(g: &mut LayoutGraph) {
    let mut memo: FxHashMap<String, i32> = FxHashMap::default();
    let mut entered: FxHashSet<String> = FxHashSet::default();
    for source in g.sources() {
        // Iterative so arbitrarily long user chains cannot blow the stack.
        let mut stack: Vec<(String, bool)> = vec![(source, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                let mut best = i32::MAX;
                for e in g.out_edges(&v, None) {
                    if let Some(&wr) = memo.get(&e.w) {
                        let minlen = g.edge_by_key(&e).map(|l| l.minlen).unwrap_or(1);
                        best = best.min(wr - minlen);
                    }
                }
                if best == i32::MAX {
                    best = 0;
                }
                memo.insert(v, best);
                continue;
            }
            if !entered.insert(v.clone()) {
                continue;
            }
            stack.push((v.clone(), true));
            let mut outs = g.out_edges(&v, None);
            outs.reverse();
            for e in outs {
                if !entered.contains(&e.w) {
                    stack.push((e.w, false));
                }
            }
        }
    }
    for (v, rank) in memo {
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
    }
}
