//! Per-rank view of the layout graph used by one sweep step.
//!
//! The movable layer's nodes (plus any cluster spanning the rank) become
//! children of a synthetic root; every adjacency to the fixed layer becomes
//! an edge pointing into the movable node, with parallel edges collapsed by
//! summing weights. Fixed-layer endpoints carry their current order so
//! barycenters can be computed locally.

use rorqual_graphlib::{Graph, GraphOptions};

use crate::LayoutGraph;
use crate::model::BorderKind;
use crate::util::IdMinter;

/// Which adjacency ties the movable layer to the fixed one: in-edges for a
/// downward sweep, out-edges for an upward one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    /// For clusters: the border dummies flanking them on this rank.
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerInfo {
    pub root: String,
}

pub type LayerGraph = Graph<LayerNode, LayerEdge, LayerInfo>;

pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    ids: &mut IdMinter,
) -> LayerGraph {
    let mut lg: LayerGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: false,
        compound: true,
    });
    let root = ids.node_id(g, "_lr");
    lg.set_graph(LayerInfo { root: root.clone() });
    lg.set_node(root.clone(), LayerNode::default());

    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let spans_rank = matches!(
            (node.min_rank, node.max_rank),
            (Some(min), Some(max)) if min <= rank && rank <= max
        );
        if node.rank != Some(rank) && !spans_rank {
            continue;
        }

        let label = if node.min_rank.is_some() {
            LayerNode {
                order: node.order,
                border_left: node.border_at(BorderKind::Left, rank as usize).map(str::to_string),
                border_right: node.border_at(BorderKind::Right, rank as usize).map(str::to_string),
            }
        } else {
            LayerNode {
                order: node.order,
                ..Default::default()
            }
        };
        lg.set_node(v.clone(), label);
        let parent = g.parent(&v).unwrap_or(&root).to_string();
        // Parent cycles cannot arise here: the hierarchy mirrors the layout
        // graph's, which is already a forest.
        let _ = lg.set_parent(&v, Some(&parent));

        let adjacent = match relationship {
            Relationship::InEdges => g.in_edges(&v, None),
            Relationship::OutEdges => g.out_edges(&v, None),
        };
        for e in adjacent {
            let u = if e.v == v { e.w.clone() } else { e.v.clone() };
            if !lg.has_node(&u) {
                lg.set_node(
                    u.clone(),
                    LayerNode {
                        order: g.node(&u).and_then(|n| n.order),
                        ..Default::default()
                    },
                );
            }
            let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
            let prior = lg.edge(&u, &v, None).map(|l| l.weight).unwrap_or(0.0);
            lg.set_edge(
                u.clone(),
                v.clone(),
                LayerEdge {
                    weight: prior + weight,
                },
            );
        }
    }
    lg
}
