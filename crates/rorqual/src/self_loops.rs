//! Self-loops are lifted off the graph before layout, given placeholder
//! nodes next to their endpoint during ordering, and routed as small lobes
//! on the right side of the node at the end.

use crate::LayoutGraph;
use crate::model::{DummyKind, NodeLabel, Point, SelfLoop};
use crate::util::{IdMinter, add_dummy_node, build_layer_matrix};

/// Moves every `v -> v` edge onto its node's label; the rest of the pipeline
/// only sees proper edges.
pub fn remove_self_loops(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if e.v != e.w {
            continue;
        }
        if let Some(label) = g.remove_edge_key(&e) {
            if let Some(node) = g.node_mut(&e.v) {
                node.self_loops.push(SelfLoop { key: e, label });
            }
        }
    }
}

/// Re-inserts each recorded loop as a sized placeholder directly to the
/// right of its node, shifting the rest of the layer over.
pub fn insert_self_loops(g: &mut LayoutGraph, ids: &mut IdMinter) {
    for layer in build_layer_matrix(g) {
        let mut order_shift = 0usize;
        for (i, v) in layer.iter().enumerate() {
            let (rank, loops) = match g.node_mut(v) {
                Some(node) => {
                    node.order = Some(i + order_shift);
                    (node.rank, std::mem::take(&mut node.self_loops))
                }
                None => continue,
            };
            for sl in loops {
                order_shift += 1;
                let label = NodeLabel {
                    width: sl.label.width,
                    height: sl.label.height,
                    rank,
                    order: Some(i + order_shift),
                    self_loop: Some(sl),
                    ..Default::default()
                };
                add_dummy_node(g, DummyKind::SelfLoop, label, "_se", ids);
            }
        }
    }
}

/// Replaces each placeholder with the restored loop edge, routed as five
/// points bulging from the node's right side, the label centered where the
/// placeholder sat.
pub fn position_self_loops(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v).cloned() else {
            continue;
        };
        if node.dummy != Some(DummyKind::SelfLoop) {
            continue;
        }
        let Some(sl) = node.self_loop else {
            continue;
        };
        let Some(anchor) = g.node(&sl.key.v).cloned() else {
            continue;
        };
        let x = anchor.x.unwrap_or(0.0) + anchor.width / 2.0;
        let y = anchor.y.unwrap_or(0.0);
        let dx = node.x.unwrap_or(0.0) - x;
        let dy = anchor.height / 2.0;
        g.remove_node(&v);

        let mut label = sl.label;
        label.points = vec![
            Point::new(x + 2.0 * dx / 3.0, y - dy),
            Point::new(x + 5.0 * dx / 6.0, y - dy),
            Point::new(x + dx, y),
            Point::new(x + 5.0 * dx / 6.0, y + dy),
            Point::new(x + 2.0 * dx / 3.0, y + dy),
        ];
        label.x = node.x;
        label.y = node.y;
        g.set_edge_named(sl.key.v, sl.key.w, sl.key.name, Some(label));
    }
}
