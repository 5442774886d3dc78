//! Cycle breaking: reverse a feedback arc set before layout, restore it after.

use rustc_hash::FxHashSet;
use tracing::debug;

use rorqual_graphlib::EdgeKey;

use crate::LayoutGraph;
use crate::greedy_fas;
use crate::model::Acyclicer;
use crate::util::IdMinter;

/// Makes the graph a DAG by reversing every edge in a feedback arc set.
/// Reversed edges keep their original name in `forward_name` and are tagged
/// `reversed`; the replacement name is freshly minted so it cannot collide
/// with existing parallel edges.
pub fn run(g: &mut LayoutGraph, ids: &mut IdMinter) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => greedy_fas::greedy_fas(g),
        Acyclicer::DepthFirst => dfs_fas(g),
    };
    debug!(reversed = fas.len(), "breaking cycles");
    for e in fas.into_iter().filter(|e| e.v != e.w) {
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name;
        label.reversed = true;
        let name = ids.edge_name(g, &e.w, &e.v, "rev");
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

/// Restores every reversed edge exactly: original direction, original name,
/// tags removed. Route points are flipped separately, before this runs.
pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let reversed = g.edge_by_key(&e).is_some_and(|label| label.reversed);
        if !reversed {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

// Back edges of a depth-first spanning forest rooted at every node in
// insertion order. The traversal keeps its own stack so path length is not
// limited by the call stack.
fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    enum Frame {
        Enter(String),
        Leave(String),
    }

    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<Frame> = Vec::new();

    for root in g.node_ids() {
        if visited.contains(&root) {
            continue;
        }
        stack.push(Frame::Enter(root));
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(v) => {
                    if !visited.insert(v.clone()) {
                        continue;
                    }
                    on_stack.insert(v.clone());
                    stack.push(Frame::Leave(v.clone()));
                    let mut next: Vec<String> = Vec::new();
                    for e in g.out_edges(&v, None) {
                        if on_stack.contains(&e.w) {
                            fas.push(e);
                        } else if !visited.contains(&e.w) {
                            next.push(e.w);
                        }
                    }
                    // Pushed in reverse so children pop in edge order.
                    for w in next.into_iter().rev() {
                        stack.push(Frame::Enter(w));
                    }
                }
                Frame::Leave(v) => {
                    on_stack.remove(&v);
                }
            }
        }
    }
    fas
}
