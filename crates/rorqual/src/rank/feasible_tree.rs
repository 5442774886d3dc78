//! Tight spanning tree construction.

use rorqual_graphlib::{EdgeKey, Graph, GraphOptions};

use crate::LayoutGraph;
use crate::rank::slack;

/// Node attributes of the auxiliary spanning tree: postorder interval
/// numbering plus the tree parent, maintained by network simplex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub low: usize,
    pub lim: usize,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdge {
    pub cutvalue: f64,
}

/// Undirected spanning tree over a subset of the layout graph's nodes.
pub type TreeGraph = Graph<TreeNode, TreeEdge, ()>;

/// Builds a spanning tree of tight edges, shifting ranks as needed so every
/// tree edge has zero slack. Starts from the first node in insertion order.
///
/// The input must already be ranked (longest path) with non-negative slack
/// everywhere. On a connected graph the returned tree spans every node.
pub fn feasible_tree(g: &mut LayoutGraph) -> TreeGraph {
    let mut tree: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    let Some(start) = g.node_ids().into_iter().next() else {
        return tree;
    };
    let size = g.node_count();
    tree.set_node(start, TreeNode::default());

    while tight_tree(&mut tree, g) < size {
        let Some(edge) = find_min_slack_edge(&tree, g) else {
            // Disconnected input: no edge crosses the tree boundary. The
            // contract requires a connected graph; stop rather than spin.
            break;
        };
        let delta = if tree.has_node(&edge.v) {
            slack(g, &edge)
        } else {
            -slack(g, &edge)
        };
        for v in tree.node_ids() {
            if let Some(node) = g.node_mut(&v) {
                node.rank = Some(node.rank.unwrap_or(0) + delta);
            }
        }
    }
    tree
}

/// Grows the tree along zero-slack edges as far as possible and returns the
/// number of nodes reached.
pub fn tight_tree(tree: &mut TreeGraph, g: &LayoutGraph) -> usize {
    let mut stack: Vec<String> = tree.node_ids();
    stack.reverse();
    while let Some(v) = stack.pop() {
        for e in g.node_edges(&v) {
            let w = if v == e.v { e.w.clone() } else { e.v.clone() };
            if !tree.has_node(&w) && slack(g, &e) == 0 {
                tree.set_node(w.clone(), TreeNode::default());
                tree.set_edge(v.clone(), w.clone(), TreeEdge::default());
                stack.push(w);
            }
        }
    }
    tree.node_count()
}

// The minimum-slack graph edge with exactly one endpoint in the tree.
fn find_min_slack_edge(tree: &TreeGraph, g: &LayoutGraph) -> Option<EdgeKey> {
    let mut best: Option<(i32, EdgeKey)> = None;
    for e in g.edge_keys() {
        if tree.has_node(&e.v) != tree.has_node(&e.w) {
            let s = slack(g, &e);
            if best.as_ref().is_none_or(|(bs, _)| s < *bs) {
                best = Some((s, e));
            }
        }
    }
    best.map(|(_, e)| e)
}
