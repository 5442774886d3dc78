//! Rank direction support. The pipeline always lays out top-to-bottom; for
//! the other directions the graph's dimensions are swapped going in and the
//! produced coordinates are transformed coming out.

use crate::LayoutGraph;

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if rankdir.is_reversed() {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            std::mem::swap(&mut node.width, &mut node.height);
        }
    }
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            std::mem::swap(&mut edge.width, &mut edge.height);
        }
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            node.y = node.y.map(|y| -y);
        }
    }
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            for p in &mut edge.points {
                p.y = -p.y;
            }
            edge.y = edge.y.map(|y| -y);
        }
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            std::mem::swap(&mut node.x, &mut node.y);
        }
    }
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            for p in &mut edge.points {
                std::mem::swap(&mut p.x, &mut p.y);
            }
            std::mem::swap(&mut edge.x, &mut edge.y);
        }
    }
}
