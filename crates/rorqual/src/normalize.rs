//! Splits multi-rank edges into chains of unit-span dummy nodes, and puts
//! them back together after positioning.

use tracing::debug;

use crate::LayoutGraph;
use crate::model::{DummyKind, EdgeLabel, NodeLabel, Point};
use crate::util::{IdMinter, add_dummy_node};

/// Replaces every edge spanning more than one rank with a chain of dummy
/// nodes connected by unit-length edges carrying the original weight. The
/// dummy sitting at the edge's `label_rank` takes over the label box. The
/// first dummy of each chain is recorded in `dummy_chains` for [`undo`] and
/// for hierarchy reassignment.
pub fn run(g: &mut LayoutGraph, ids: &mut IdMinter) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
        let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
        if w_rank == v_rank + 1 {
            continue;
        }
        let Some(mut edge_label) = g.remove_edge_key(&e) else {
            continue;
        };
        edge_label.points.clear();
        let label_rank = edge_label.label_rank;
        let weight = edge_label.weight;

        let mut v = e.v.clone();
        let mut first = true;
        for rank in (v_rank + 1)..w_rank {
            let mut attrs = NodeLabel {
                edge_label: Some(edge_label.clone()),
                edge_obj: Some(e.clone()),
                rank: Some(rank),
                ..Default::default()
            };
            let kind = if Some(rank) == label_rank {
                attrs.width = edge_label.width;
                attrs.height = edge_label.height;
                attrs.labelpos = Some(edge_label.labelpos);
                DummyKind::EdgeLabel
            } else {
                DummyKind::Edge
            };
            let dummy = add_dummy_node(g, kind, attrs, "_d", ids);
            g.set_edge_named(
                v,
                dummy.clone(),
                e.name.clone(),
                Some(EdgeLabel::weighted(weight, 1)),
            );
            if first {
                g.graph_mut().dummy_chains.push(dummy.clone());
                first = false;
            }
            v = dummy;
        }
        g.set_edge_named(v, e.w.clone(), e.name, Some(EdgeLabel::weighted(weight, 1)));
    }
    debug!(chains = g.graph().dummy_chains.len(), "normalized long edges");
}

/// Walks every dummy chain, restoring the original edge with the dummies'
/// coordinates as its route points (in chain order) and lifting label
/// placement off the label dummy.
pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for first in chains {
        let Some(head) = g.node(&first).cloned() else {
            continue;
        };
        let Some(mut label) = head.edge_label else {
            continue;
        };
        let Some(key) = head.edge_obj else {
            continue;
        };
        label.points.clear();

        let mut v = first;
        while let Some(node) = g.node(&v).cloned() {
            if node.dummy.is_none() {
                break;
            }
            let next = g.successors(&v).into_iter().next();
            g.remove_node(&v);
            label
                .points
                .push(Point::new(node.x.unwrap_or(0.0), node.y.unwrap_or(0.0)));
            if node.dummy == Some(DummyKind::EdgeLabel) {
                label.x = node.x;
                label.y = node.y;
                label.width = node.width;
                label.height = node.height;
            }
            match next {
                Some(w) => v = w,
                None => break,
            }
        }
        g.set_edge_named(key.v, key.w, key.name, Some(label));
    }
}
