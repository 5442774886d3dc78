//! Network simplex ranking (Gansner et al.).
//!
//! Runs on a simplified copy of the graph (parallel edges merged) and copies
//! the optimized ranks back. The loop repeatedly removes a tree edge with
//! negative cut value, replaces it with the minimum-slack graph edge crossing
//! the same cut in the opposite orientation, and re-derives ranks from the
//! updated tree.

use rustc_hash::FxHashSet;
use tracing::trace;

use rorqual_graphlib::{EdgeKey, alg};

use crate::LayoutGraph;
use crate::rank::feasible_tree::{TreeGraph, feasible_tree};
use crate::rank::{longest_path, slack};
use crate::util::simplify;

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut simple = simplify(g);
    longest_path(&mut simple);
    let mut tree = feasible_tree(&mut simple);
    init_low_lim(&mut tree);
    init_cut_values(&mut tree, &simple);

    while let Some(e) = leave_edge(&tree) {
        let Some(f) = enter_edge(&tree, &simple, &e) else {
            break;
        };
        trace!(leave = ?e, enter = ?f, "simplex pivot");
        exchange_edges(&mut tree, &mut simple, &e, &f);
    }

    for v in simple.node_ids() {
        let rank = simple.node(&v).and_then(|n| n.rank);
        if let Some(node) = g.node_mut(&v) {
            node.rank = rank;
        }
    }
}

/// Postorder low/lim numbering from the tree's first node, recording each
/// node's tree parent. `low..=lim` intervals give O(1) descendant tests.
pub fn init_low_lim(tree: &mut TreeGraph) {
    let Some(root) = tree.node_ids().into_iter().next() else {
        return;
    };
    struct Frame {
        v: String,
        parent: Option<String>,
        low: usize,
        ws: Vec<String>,
        i: usize,
    }
    let mut next_lim = 1usize;
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(root.clone());
    let mut stack = vec![Frame {
        ws: tree.neighbors(&root),
        v: root,
        parent: None,
        low: next_lim,
        i: 0,
    }];
    while let Some(frame) = stack.last_mut() {
        if frame.i < frame.ws.len() {
            let w = frame.ws[frame.i].clone();
            frame.i += 1;
            let parent = Some(frame.v.clone());
            if visited.insert(w.clone()) {
                stack.push(Frame {
                    ws: tree.neighbors(&w),
                    v: w,
                    parent,
                    low: next_lim,
                    i: 0,
                });
            }
        } else if let Some(frame) = stack.pop() {
            if let Some(label) = tree.node_mut(&frame.v) {
                label.low = frame.low;
                label.lim = next_lim;
                label.parent = frame.parent;
            }
            next_lim += 1;
        }
    }
}

/// Computes cut values for every tree edge by postorder accumulation.
pub fn init_cut_values(tree: &mut TreeGraph, g: &LayoutGraph) {
    let roots = tree.node_ids();
    let root_refs: Vec<&str> = roots.iter().map(String::as_str).collect();
    let Ok(mut vs) = alg::postorder(tree, &root_refs) else {
        return;
    };
    vs.pop(); // the root has no parent edge
    for v in vs {
        let cut = calc_cut_value(tree, g, &v);
        let parent = tree
            .node(&v)
            .and_then(|n| n.parent.clone())
            .unwrap_or_default();
        if let Some(edge) = tree.edge_mut(&v, &parent, None) {
            edge.cutvalue = cut;
        }
    }
}

/// Cut value of the tree edge between `child` and its parent: the incident
/// graph-edge weight plus the signed weights of all other edges touching
/// `child`, folding in the already-known cut values of tree edges that share
/// `child`.
pub fn calc_cut_value(tree: &TreeGraph, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = tree.node(child).and_then(|n| n.parent.clone()) else {
        return 0.0;
    };
    // True when child is the tail of the tree edge in the directed graph.
    let (child_is_tail, mut cut_value) = match g.edge(child, &parent, None) {
        Some(label) => (true, label.weight),
        None => (
            false,
            g.edge(&parent, child, None).map(|l| l.weight).unwrap_or(0.0),
        ),
    };
    for e in g.node_edges(child) {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { &e.w } else { &e.v };
        if other == &parent {
            continue;
        }
        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
        cut_value += if points_to_head {
            other_weight
        } else {
            -other_weight
        };
        if let Some(tree_edge) = tree.edge(child, other, None) {
            let other_cut = tree_edge.cutvalue;
            cut_value += if points_to_head { -other_cut } else { other_cut };
        }
    }
    cut_value
}

/// Any tree edge with a negative cut value, or `None` at the local optimum.
pub fn leave_edge(tree: &TreeGraph) -> Option<EdgeKey> {
    tree.edge_keys()
        .into_iter()
        .find(|e| tree.edge_by_key(e).is_some_and(|l| l.cutvalue < 0.0))
}

/// The minimum-slack graph edge crossing the cut of `edge` in the opposite
/// orientation, classified by low/lim interval containment.
pub fn enter_edge(tree: &TreeGraph, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (mut v, mut w) = (edge.v.clone(), edge.w.clone());
    // Orient the tree edge to match the directed graph.
    if g.edge(&v, &w, None).is_none() {
        std::mem::swap(&mut v, &mut w);
    }
    let v_label = tree.node(&v).cloned().unwrap_or_default();
    let w_label = tree.node(&w).cloned().unwrap_or_default();
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        // The tree root is on the tail side: flip the head/tail test below.
        (w_label, true)
    } else {
        (v_label, false)
    };

    let is_descendant = |id: &str| -> bool {
        let Some(label) = tree.node(id) else {
            return false;
        };
        tail_label.low <= label.lim && label.lim <= tail_label.lim
    };

    let mut best: Option<(i32, EdgeKey)> = None;
    for e in g.edge_keys() {
        if flip == is_descendant(&e.v) && flip != is_descendant(&e.w) {
            let s = slack(g, &e);
            if best.as_ref().is_none_or(|(bs, _)| s < *bs) {
                best = Some((s, e));
            }
        }
    }
    best.map(|(_, e)| e)
}

/// Swaps `e` out of the tree for `f`, renumbers, recomputes cut values and
/// re-derives every rank by a preorder walk from the tree root.
pub fn exchange_edges(tree: &mut TreeGraph, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    tree.remove_edge(&e.v, &e.w, None);
    tree.set_edge(f.v.clone(), f.w.clone(), Default::default());
    init_low_lim(tree);
    init_cut_values(tree, g);
    update_ranks(tree, g);
}

fn update_ranks(tree: &TreeGraph, g: &mut LayoutGraph) {
    let Some(root) = tree.node_ids().into_iter().next() else {
        return;
    };
    let Ok(vs) = alg::preorder(tree, &[&root]) else {
        return;
    };
    for v in vs.into_iter().skip(1) {
        let Some(parent) = tree.node(&v).and_then(|n| n.parent.clone()) else {
            continue;
        };
        let (minlen, flipped) = match g.edge(&v, &parent, None) {
            Some(label) => (label.minlen, false),
            None => (
                g.edge(&parent, &v, None).map(|l| l.minlen).unwrap_or(1),
                true,
            ),
        };
        let parent_rank = g.node(&parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(parent_rank + if flipped { minlen } else { -minlen });
        }
    }
}
