//! Left/right border segments for clusters.
//!
//! After ranks are final, every cluster gets one border dummy per rank on
//! each side, chained vertically, so ordering and positioning treat the
//! cluster boundary as a pair of edge-like paths.

use rorqual_graphlib::GraphError;

use crate::LayoutGraph;
use crate::model::{BorderKind, DummyKind, EdgeLabel, NodeLabel};
use crate::util::{IdMinter, add_dummy_node};

pub fn add_border_segments(g: &mut LayoutGraph, ids: &mut IdMinter) -> Result<(), GraphError> {
    // Postorder over the cluster forest, iterative so nesting depth is not
    // limited by the call stack.
    let mut order: Vec<String> = Vec::new();
    let mut stack: Vec<String> = g.root_children();
    while let Some(v) = stack.pop() {
        stack.extend(g.children(&v));
        order.push(v);
    }
    for v in order.into_iter().rev() {
        add_cluster_borders(g, &v, ids)?;
    }
    Ok(())
}

fn add_cluster_borders(g: &mut LayoutGraph, v: &str, ids: &mut IdMinter) -> Result<(), GraphError> {
    let span = g
        .node(v)
        .and_then(|n| Some((n.min_rank?, n.max_rank?)));
    if let Some((min_rank, max_rank)) = span {
        if let Some(node) = g.node_mut(v) {
            node.border_left.clear();
            node.border_right.clear();
        }
        for rank in min_rank..=max_rank {
            add_border_node(g, BorderKind::Left, "_bl", v, rank, ids)?;
            add_border_node(g, BorderKind::Right, "_br", v, rank, ids)?;
        }
    }
    Ok(())
}

fn add_border_node(
    g: &mut LayoutGraph,
    kind: BorderKind,
    prefix: &str,
    sg: &str,
    rank: i32,
    ids: &mut IdMinter,
) -> Result<(), GraphError> {
    let label = NodeLabel {
        rank: Some(rank),
        border_kind: Some(kind),
        ..Default::default()
    };
    let prev = if rank > 0 {
        g.node(sg)
            .and_then(|n| n.border_at(kind, (rank - 1) as usize))
            .map(str::to_string)
    } else {
        None
    };
    let curr = add_dummy_node(g, DummyKind::Border, label, prefix, ids);
    if let Some(node) = g.node_mut(sg) {
        node.set_border_at(kind, rank as usize, curr.clone());
    }
    g.set_parent(&curr, Some(sg))?;
    if let Some(prev) = prev {
        g.set_edge(prev, curr, EdgeLabel::weighted(1.0, 1));
    }
    Ok(())
}
