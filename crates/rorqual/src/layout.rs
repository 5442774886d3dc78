//! The layout pipeline entry point.
//!
//! [`layout`] copies the recognized attributes of the caller's graph into a
//! private working graph, runs the full pipeline on it, and writes the
//! results (coordinates, edge routes, drawing size) back. The caller's graph
//! is never mutated structurally.

use tracing::debug;

use rorqual_graphlib::{Graph, GraphOptions};

use crate::error::LayoutError;
use crate::model::{DummyKind, EdgeLabel, GraphLabel, LabelPos, NodeLabel, Point};
use crate::util::{self, IdMinter, Rect, intersect_rect};
use crate::{
    LayoutGraph, acyclic, border, coordinate_system, nesting, normalize, order,
    parent_dummy_chains, position, rank, self_loops,
};

pub fn layout(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    let mut ids = IdMinter::new();
    let mut working = build_layout_graph(g)?;
    run_layout(&mut working, &mut ids)?;
    update_input_graph(g, &working);
    Ok(())
}

fn run_layout(g: &mut LayoutGraph, ids: &mut IdMinter) -> Result<(), LayoutError> {
    debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        "starting layout"
    );
    make_space_for_edge_labels(g);
    self_loops::remove_self_loops(g);
    acyclic::run(g, ids);
    nesting::run(g, ids)?;
    assign_ranks(g);
    inject_edge_label_proxies(g, ids);
    util::remove_empty_ranks(g);
    nesting::cleanup(g);
    util::normalize_ranks(g);
    assign_rank_min_max(g);
    remove_edge_label_proxies(g);
    normalize::run(g, ids);
    parent_dummy_chains::parent_dummy_chains(g)?;
    border::add_border_segments(g, ids)?;
    order::order(g, ids);
    self_loops::insert_self_loops(g, ids);
    coordinate_system::adjust(g);
    position::position(g);
    self_loops::position_self_loops(g);
    remove_border_nodes(g);
    normalize::undo(g);
    fixup_edge_label_coords(g);
    coordinate_system::undo(g);
    translate_graph(g);
    assign_node_intersects(g)?;
    reverse_points_for_reversed_edges(g);
    acyclic::undo(g);
    debug!(
        width = g.graph().width,
        height = g.graph().height,
        "layout finished"
    );
    Ok(())
}

// Copies only the attributes the pipeline understands, so stray state on the
// input can never leak into a layout run.
fn build_layout_graph(input: &LayoutGraph) -> Result<LayoutGraph, LayoutError> {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: true,
    });
    let src = input.graph();
    g.set_graph(GraphLabel {
        rankdir: src.rankdir,
        align: src.align,
        nodesep: src.nodesep,
        edgesep: src.edgesep,
        ranksep: src.ranksep,
        marginx: src.marginx,
        marginy: src.marginy,
        acyclicer: src.acyclicer,
        ranker: src.ranker,
        ..Default::default()
    });

    for v in input.node_ids() {
        let node = input.node(&v).cloned().unwrap_or_default();
        g.set_node(v.clone(), NodeLabel::sized(node.width, node.height));
    }
    for v in input.node_ids() {
        if let Some(parent) = input.parent(&v) {
            g.set_parent(&v, Some(parent))?;
        }
    }
    for e in input.edge_keys() {
        let label = input.edge_by_key(&e).cloned().unwrap_or_default();
        g.set_edge_named(
            e.v,
            e.w,
            e.name,
            Some(EdgeLabel {
                minlen: label.minlen,
                weight: label.weight,
                width: label.width,
                height: label.height,
                labeloffset: label.labeloffset,
                labelpos: label.labelpos,
                ..Default::default()
            }),
        );
    }
    Ok(g)
}

fn update_input_graph(input: &mut LayoutGraph, layout: &LayoutGraph) {
    for v in input.node_ids() {
        let Some(done) = layout.node(&v) else { continue };
        let is_cluster = !layout.children(&v).is_empty();
        let (x, y, width, height) = (done.x, done.y, done.width, done.height);
        if let Some(node) = input.node_mut(&v) {
            node.x = x;
            node.y = y;
            if is_cluster {
                node.width = width;
                node.height = height;
            }
        }
    }
    for e in input.edge_keys() {
        let Some(done) = layout.edge_by_key(&e) else {
            continue;
        };
        let (points, x, y) = (done.points.clone(), done.x, done.y);
        if let Some(edge) = input.edge_by_key_mut(&e) {
            edge.points = points;
            if x.is_some() {
                edge.x = x;
                edge.y = y;
            }
        }
    }
    input.graph_mut().width = layout.graph().width;
    input.graph_mut().height = layout.graph().height;
}

/// Halves `ranksep` and doubles every `minlen` so each edge crosses a spare
/// rank in the middle; labeled edges park their label box there. Off-center
/// labels also reserve the label offset on the side the separation check
/// looks at.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    g.graph_mut().ranksep /= 2.0;
    let horizontal = g.graph().rankdir.is_horizontal();
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            edge.minlen *= 2;
            if edge.labelpos != LabelPos::C {
                if horizontal {
                    edge.height += edge.labeloffset;
                } else {
                    edge.width += edge.labeloffset;
                }
            }
        }
    }
}

// Ranking runs on a flattened view; the hierarchy would confuse the rankers.
fn assign_ranks(g: &mut LayoutGraph) {
    let mut flat = util::as_non_compound_graph(g);
    rank::rank(&mut flat);
    for v in flat.node_ids() {
        let rank = flat.node(&v).and_then(|n| n.rank);
        if let Some(node) = g.node_mut(&v) {
            node.rank = rank;
        }
    }
}

/// Stakes out a place for each labeled edge's label box at its midpoint
/// rank, so removing empty ranks cannot collapse the space the label needs.
fn inject_edge_label_proxies(g: &mut LayoutGraph, ids: &mut IdMinter) {
    for e in g.edge_keys() {
        let Some(edge) = g.edge_by_key(&e) else {
            continue;
        };
        if edge.width == 0.0 || edge.height == 0.0 {
            continue;
        }
        let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
        let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
        let label = NodeLabel {
            rank: Some(v_rank + (w_rank - v_rank) / 2),
            edge_obj: Some(e),
            ..Default::default()
        };
        util::add_dummy_node(g, DummyKind::EdgeProxy, label, "_ep", ids);
    }
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        if node.dummy != Some(DummyKind::EdgeProxy) {
            continue;
        }
        let rank = node.rank;
        let key = node.edge_obj.clone();
        if let Some(key) = key {
            if let Some(edge) = g.edge_by_key_mut(&key) {
                edge.label_rank = rank;
            }
        }
        g.remove_node(&v);
    }
}

// Copies each cluster's rank span off its border top/bottom nodes and
// records the overall maximum.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0;
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let Some(top) = node.border_top.clone() else {
            continue;
        };
        let Some(bottom) = node.border_bottom.clone() else {
            continue;
        };
        let min = g.node(&top).and_then(|n| n.rank);
        let max = g.node(&bottom).and_then(|n| n.rank);
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
        if let Some(max) = max {
            max_rank = max_rank.max(max);
        }
    }
    g.graph_mut().max_rank = Some(max_rank);
}

/// Sizes each cluster to its border rectangle, then drops all border
/// dummies.
fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            continue;
        }
        let Some(node) = g.node(&v).cloned() else {
            continue;
        };
        let coords = |id: Option<&String>| -> Option<(f64, f64)> {
            let n = g.node(id?.as_str())?;
            Some((n.x.unwrap_or(0.0), n.y.unwrap_or(0.0)))
        };
        let top = coords(node.border_top.as_ref());
        let bottom = coords(node.border_bottom.as_ref());
        let left = coords(node.border_left.last().and_then(|s| s.as_ref()));
        let right = coords(node.border_right.last().and_then(|s| s.as_ref()));
        let (Some(t), Some(b), Some(l), Some(r)) = (top, bottom, left, right) else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.width = (r.0 - l.0).abs();
            node.height = (b.1 - t.1).abs();
            node.x = Some(l.0 + node.width / 2.0);
            node.y = Some(t.1 + node.height / 2.0);
        }
    }
    for v in g.node_ids() {
        if g.node(&v).and_then(|n| n.dummy) == Some(DummyKind::Border) {
            g.remove_node(&v);
        }
    }
}

// Off-center labels were widened earlier to reserve space; shrink them back
// and shift the label center to the reserved side.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let Some(edge) = g.edge_by_key_mut(&e) else {
            continue;
        };
        let Some(x) = edge.x else { continue };
        match edge.labelpos {
            LabelPos::L => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x - (edge.width / 2.0 + edge.labeloffset));
            }
            LabelPos::R => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x + edge.width / 2.0 + edge.labeloffset);
            }
            LabelPos::C => {}
        }
    }
}

/// Shifts the whole drawing into the positive quadrant (plus margins) and
/// records its final size on the graph label.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x: f64 = 0.0;
    let mut min_y = f64::INFINITY;
    let mut max_y: f64 = 0.0;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };

    for v in g.node_ids() {
        if let Some(node) = g.node(&v) {
            extend(
                node.x.unwrap_or(0.0),
                node.y.unwrap_or(0.0),
                node.width,
                node.height,
            );
        }
    }
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key(&e) {
            if let (Some(x), Some(y)) = (edge.x, edge.y) {
                extend(x, y, edge.width, edge.height);
            }
        }
    }

    let (margin_x, margin_y) = (g.graph().marginx, g.graph().marginy);
    min_x -= margin_x;
    min_y -= margin_y;

    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            node.x = node.x.map(|x| x - min_x);
            node.y = node.y.map(|y| y - min_y);
        }
    }
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            for p in &mut edge.points {
                p.x -= min_x;
                p.y -= min_y;
            }
            edge.x = edge.x.map(|x| x - min_x);
            edge.y = edge.y.map(|y| y - min_y);
        }
    }

    g.graph_mut().width = max_x - min_x + margin_x;
    g.graph_mut().height = max_y - min_y + margin_y;
}

// Extends every route to the boundary of its endpoint nodes.
fn assign_node_intersects(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    for e in g.edge_keys() {
        // Self loops keep their synthesized five-point lobe.
        if e.v == e.w {
            continue;
        }
        let rect_of = |id: &str| -> Rect {
            let node = g.node(id).cloned().unwrap_or_default();
            Rect {
                x: node.x.unwrap_or(0.0),
                y: node.y.unwrap_or(0.0),
                width: node.width,
                height: node.height,
            }
        };
        let v_rect = rect_of(&e.v);
        let w_rect = rect_of(&e.w);
        let Some(edge) = g.edge_by_key(&e) else {
            continue;
        };
        let (p1, p2) = match (edge.points.first(), edge.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (
                Point::new(w_rect.x, w_rect.y),
                Point::new(v_rect.x, v_rect.y),
            ),
        };
        let start =
            intersect_rect(v_rect, p1).ok_or_else(|| LayoutError::DegenerateIntersection {
                node: e.v.clone(),
            })?;
        let end =
            intersect_rect(w_rect, p2).ok_or_else(|| LayoutError::DegenerateIntersection {
                node: e.w.clone(),
            })?;
        if let Some(edge) = g.edge_by_key_mut(&e) {
            edge.points.insert(0, start);
            edge.points.push(end);
        }
    }
    Ok(())
}

fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if let Some(edge) = g.edge_by_key_mut(&e) {
            if edge.reversed {
                edge.points.reverse();
            }
        }
    }
}
