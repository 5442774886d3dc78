//! Coordinate assignment: ranks become y bands separated by `ranksep`, x
//! comes from the Brandes-Köpf alignment in [`bk`].

pub mod bk;

use crate::LayoutGraph;
use crate::util::{as_non_compound_graph, build_layer_matrix};

pub fn position(g: &mut LayoutGraph) {
    let mut flat = as_non_compound_graph(g);
    position_y(&mut flat);
    for (v, x) in bk::position_x(&flat) {
        if let Some(node) = flat.node_mut(&v) {
            node.x = Some(x);
        }
    }
    for v in flat.node_ids() {
        let Some(pos) = flat.node(&v).map(|n| (n.x, n.y)) else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.x = pos.0;
            node.y = pos.1;
        }
    }
}

/// Centers every layer's nodes vertically within a band as tall as the
/// layer's tallest node.
fn position_y(g: &mut LayoutGraph) {
    let layering = build_layer_matrix(g);
    let ranksep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in &layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + ranksep;
    }
}
