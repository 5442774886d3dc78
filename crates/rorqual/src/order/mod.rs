//! Intra-rank ordering by iterated barycenter sweeps.
//!
//! Each sweep fixes one layer and sorts its neighbor by the weighted mean of
//! adjacent positions, alternating direction and bias. The best layering seen
//! (by weighted crossing count) wins; the loop stops after four sweeps
//! without improvement.

mod barycenter;
mod cross_count;
mod init_order;
mod layer_graph;
mod resolve;
mod sort;
mod subgraph;

pub use barycenter::{BarycenterEntry, barycenter};
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::{LayerEdge, LayerGraph, LayerInfo, LayerNode, Relationship, build_layer_graph};
pub use resolve::{SortEntry, resolve_conflicts};
pub use sort::{SortResult, sort};
pub use subgraph::sort_subgraph;

use rorqual_graphlib::Graph;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::LayoutGraph;
use crate::util::{self, IdMinter};

/// Ordering constraints between sibling subgraphs, accumulated over one
/// sweep so clusters are not interleaved.
pub type ConstraintGraph = Graph<(), (), ()>;

pub fn order(g: &mut LayoutGraph, ids: &mut IdMinter) {
    let Some(max_rank) = util::max_rank(g) else {
        return;
    };
    let down_ranks: Vec<i32> = (1..=max_rank).collect();
    let up_ranks: Vec<i32> = (0..max_rank).rev().collect();

    let layering = init_order(g);
    assign_order(g, &layering);

    let mut best_cc = f64::INFINITY;
    let mut best: Vec<Vec<String>> = Vec::new();
    let mut i = 0usize;
    let mut last_best = 0usize;
    while last_best < 4 {
        if i % 2 == 1 {
            sweep(g, &down_ranks, Relationship::InEdges, i % 4 >= 2, ids);
        } else {
            sweep(g, &up_ranks, Relationship::OutEdges, i % 4 >= 2, ids);
        }
        let layering = util::build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best = layering;
            best_cc = cc;
        }
        i += 1;
        last_best += 1;
    }
    debug!(crossings = best_cc, sweeps = i, "ordering settled");
    assign_order(g, &best);
}

fn sweep(
    g: &mut LayoutGraph,
    ranks: &[i32],
    relationship: Relationship,
    bias_right: bool,
    ids: &mut IdMinter,
) {
    let mut cg: ConstraintGraph = Graph::new(Default::default());
    for &rank in ranks {
        let lg = build_layer_graph(g, rank, relationship, ids);
        let root = lg.graph().root.clone();
        let sorted = sort_subgraph(&lg, &root, &cg, bias_right);
        for (order, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(order);
            }
        }
        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
}

/// Writes each node's position within its layer back onto the node labels.
pub fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(order);
            }
        }
    }
}

/// Records, for every sorted node's ancestor chain, a left-to-right
/// constraint between the previous and current sibling under the same
/// parent. Only the deepest differing pair per node matters.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: FxHashMap<String, String> = FxHashMap::default();
    let mut root_prev: Option<String> = None;

    'nodes: for v in vs {
        let mut child = lg.parent(v).map(str::to_string);
        while let Some(c) = child {
            let parent = lg.parent(&c).map(str::to_string);
            let prev_child = match &parent {
                Some(p) => prev.insert(p.clone(), c.clone()),
                None => root_prev.replace(c.clone()),
            };
            if let Some(pc) = prev_child {
                if pc != c {
                    cg.set_edge(pc, c, ());
                    continue 'nodes;
                }
            }
            child = parent;
        }
    }
}
