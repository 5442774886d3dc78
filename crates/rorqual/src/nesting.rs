//! Nesting graph for compound inputs, following Sander, "Layout of Compound
//! Directed Graphs".
//!
//! Border nodes are inserted above and below every cluster and tied to the
//! cluster contents so ranking keeps the contents between them. A synthetic
//! root makes the whole graph one component. Edge `minlen`s are scaled so
//! real nodes never share a rank with border nodes.

use rustc_hash::FxHashMap;
use tracing::debug;

use rorqual_graphlib::GraphError;

use crate::LayoutGraph;
use crate::model::{DummyKind, EdgeLabel, NodeLabel};
use crate::util::{IdMinter, add_dummy_node};

pub fn run(g: &mut LayoutGraph, ids: &mut IdMinter) -> Result<(), GraphError> {
    let root = add_dummy_node(g, DummyKind::Root, NodeLabel::default(), "_root", ids);
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1) - 1;
    let node_sep = 2 * height + 1;
    debug!(height, node_sep, "expanding nesting graph");

    g.graph_mut().nesting_root = Some(root.clone());

    // Scale all minlens so ordinary nodes land between border ranks.
    for e in g.edge_keys() {
        if let Some(label) = g.edge_by_key_mut(&e) {
            label.minlen *= node_sep;
        }
    }

    // A weight large enough to keep cluster contents vertically compact.
    let weight = sum_weights(g) + 1.0;
    expand(g, &root, node_sep, weight, height, &depths, ids)?;

    g.graph_mut().node_rank_factor = Some(node_sep);
    Ok(())
}

/// Removes the synthetic root (and its edges) plus every nesting edge,
/// leaving `node_rank_factor` behind for empty-rank removal.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    for e in g.edge_keys() {
        if g.edge_by_key(&e).is_some_and(|label| label.nesting_edge) {
            g.remove_edge_key(&e);
        }
    }
}

// Depth of every node in the cluster forest; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, i32> {
    let mut depths: FxHashMap<String, i32> = FxHashMap::default();
    let mut stack: Vec<(String, i32)> = g.root_children().into_iter().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        for child in g.children(&v) {
            stack.push((child, depth + 1));
        }
        depths.insert(v, depth);
    }
    depths
}

fn sum_weights(g: &LayoutGraph) -> f64 {
    g.edge_keys()
        .iter()
        .filter_map(|e| g.edge_by_key(e))
        .map(|label| label.weight)
        .sum()
}

// Depth-first over the cluster forest with an explicit work stack, so the
// nesting depth is not limited by the call stack. Each cluster is entered
// (borders created), revisited after each child (tie edges), then left
// (root tie for top-level clusters).
fn expand(
    g: &mut LayoutGraph,
    root: &str,
    node_sep: i32,
    weight: f64,
    height: i32,
    depths: &FxHashMap<String, i32>,
    ids: &mut IdMinter,
) -> Result<(), GraphError> {
    enum Frame {
        Enter(String),
        AfterChild { ctx: usize, child: String },
        Leave(usize),
    }
    struct Cluster {
        v: String,
        top: String,
        bottom: String,
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    let mut stack: Vec<Frame> = g
        .root_children()
        .into_iter()
        .rev()
        .map(Frame::Enter)
        .collect();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(v) => {
                let children = g.children(&v);
                if children.is_empty() {
                    if v != root {
                        g.set_edge(root, v, EdgeLabel::weighted(0.0, node_sep));
                    }
                    continue;
                }

                let top = add_dummy_node(g, DummyKind::Border, NodeLabel::default(), "_bt", ids);
                let bottom = add_dummy_node(g, DummyKind::Border, NodeLabel::default(), "_bb", ids);
                g.set_parent(&top, Some(v.as_str()))?;
                g.set_parent(&bottom, Some(v.as_str()))?;
                if let Some(label) = g.node_mut(&v) {
                    label.border_top = Some(top.clone());
                    label.border_bottom = Some(bottom.clone());
                }

                let ctx = clusters.len();
                clusters.push(Cluster { v, top, bottom });
                stack.push(Frame::Leave(ctx));
                // Pushed in reverse so children pop in insertion order.
                for child in children.into_iter().rev() {
                    stack.push(Frame::AfterChild {
                        ctx,
                        child: child.clone(),
                    });
                    stack.push(Frame::Enter(child));
                }
            }
            Frame::AfterChild { ctx, child } => {
                let cluster = &clusters[ctx];
                let (child_top, child_bottom, child_is_cluster) = {
                    let node = g.node(&child).cloned().unwrap_or_default();
                    (
                        node.border_top.clone().unwrap_or_else(|| child.clone()),
                        node.border_bottom.clone().unwrap_or_else(|| child.clone()),
                        node.border_top.is_some(),
                    )
                };
                // Leaf children pull twice as hard so clusters stay compact.
                let this_weight = if child_is_cluster { weight } else { 2.0 * weight };
                let minlen = if child_top != child_bottom {
                    1
                } else {
                    height - depths[&cluster.v] + 1
                };

                let mut down = EdgeLabel::weighted(this_weight, minlen);
                down.nesting_edge = true;
                g.set_edge(cluster.top.clone(), child_top, down);

                let mut up = EdgeLabel::weighted(this_weight, minlen);
                up.nesting_edge = true;
                g.set_edge(child_bottom, cluster.bottom.clone(), up);
            }
            Frame::Leave(ctx) => {
                let cluster = &clusters[ctx];
                if g.parent(&cluster.v).is_none() {
                    g.set_edge(
                        root,
                        cluster.top.clone(),
                        EdgeLabel::weighted(0.0, height + depths[&cluster.v]),
                    );
                }
            }
        }
    }
    Ok(())
}
