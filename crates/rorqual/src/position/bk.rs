//! Brandes-Köpf horizontal coordinate assignment ("Fast and Simple
//! Horizontal Coordinate Assignment"), with the type-2 conflict handling
//! needed for cluster borders.
//!
//! Four alignments are computed (up/down x left/right), shifted onto the
//! narrowest one, and balanced by taking the median per node.

use rustc_hash::{FxHashMap, FxHashSet};

use rorqual_graphlib::{Graph, GraphOptions};

use crate::LayoutGraph;
use crate::model::{Align, BorderKind, DummyKind, LabelPos};
use crate::util::build_layer_matrix;

pub type Conflicts = FxHashMap<String, FxHashSet<String>>;

/// Marks the pair as conflicted; the order of the two nodes is irrelevant.
pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v > w { (w, v) } else { (v, w) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v > w { (w, v) } else { (v, w) };
    conflicts.get(v).is_some_and(|set| set.contains(w))
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (a
/// dummy-to-dummy edge). The inner segment wins during alignment.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();
    for pair in layering.windows(2) {
        visit_type1_layer(g, &pair[0], &pair[1], &mut conflicts);
    }
    conflicts
}

fn visit_type1_layer(
    g: &LayoutGraph,
    prev_layer: &[String],
    layer: &[String],
    conflicts: &mut Conflicts,
) {
    // k0/k1 bracket the inner segments seen so far; any predecessor outside
    // the bracket crosses one of them.
    let mut k0 = 0usize;
    let mut scan_pos = 0usize;
    let prev_layer_len = prev_layer.len();
    let last = layer.last();
    for (i, v) in layer.iter().enumerate() {
        let w = find_other_inner_segment_node(g, v);
        let k1 = match &w {
            Some(w) => g.node(w).and_then(|n| n.order).unwrap_or(0),
            None => prev_layer_len,
        };
        if w.is_some() || Some(v) == last {
            for scan_node in &layer[scan_pos..=i] {
                for u in g.predecessors(scan_node) {
                    let u_pos = g.node(&u).and_then(|n| n.order).unwrap_or(0);
                    let u_dummy = g.node(&u).and_then(|n| n.dummy).is_some();
                    let scan_dummy = g.node(scan_node).and_then(|n| n.dummy).is_some();
                    if (u_pos < k0 || k1 < u_pos) && !(u_dummy && scan_dummy) {
                        add_conflict(conflicts, &u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
}

// A dummy predecessor of a dummy node, i.e. the far end of an inner segment.
fn find_other_inner_segment_node(g: &LayoutGraph, v: &str) -> Option<String> {
    if g.node(v).and_then(|n| n.dummy).is_none() {
        return None;
    }
    g.predecessors(v)
        .into_iter()
        .find(|u| g.node(u).and_then(|n| n.dummy).is_some())
}

/// Type-2 conflicts: a dummy chain crossing a cluster border. The border
/// segment wins.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>], conflicts: &mut Conflicts) {
    for pair in layering.windows(2) {
        visit_type2_layer(g, &pair[0], &pair[1], conflicts);
    }
}

fn visit_type2_layer(
    g: &LayoutGraph,
    north: &[String],
    south: &[String],
    conflicts: &mut Conflicts,
) {
    let scan = |south_pos: usize,
                south_end: usize,
                prev_north: i64,
                next_north: i64,
                conflicts: &mut Conflicts| {
        for v in &south[south_pos..south_end] {
            if g.node(v).and_then(|n| n.dummy).is_none() {
                continue;
            }
            for u in g.predecessors(v) {
                let Some(u_node) = g.node(&u) else { continue };
                if u_node.dummy.is_some() {
                    let u_pos = u_node.order.unwrap_or(0) as i64;
                    if u_pos < prev_north || u_pos > next_north {
                        add_conflict(conflicts, &u, v);
                    }
                }
            }
        }
    };

    let mut prev_north_pos: i64 = -1;
    let mut south_pos = 0usize;
    for (south_lookahead, v) in south.iter().enumerate() {
        if g.node(v).and_then(|n| n.dummy) == Some(DummyKind::Border) {
            if let Some(pred) = g.predecessors(v).first() {
                let next_north_pos = g.node(pred).and_then(|n| n.order).unwrap_or(0) as i64;
                scan(
                    south_pos,
                    south_lookahead,
                    prev_north_pos,
                    next_north_pos,
                    conflicts,
                );
                south_pos = south_lookahead;
                prev_north_pos = next_north_pos;
            }
        }
        scan(
            south_pos,
            south.len(),
            prev_north_pos,
            north.len() as i64,
            conflicts,
        );
    }
}

/// Greedy median alignment: each node tries to align with the median of its
/// neighbors on the fixed side, skipping conflicted segments and anything
/// that would cross an earlier alignment in the same layer.
pub fn vertical_alignment(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbors: impl Fn(&str) -> Vec<String>,
) -> (FxHashMap<String, String>, FxHashMap<String, String>) {
    let mut root: FxHashMap<String, String> = FxHashMap::default();
    let mut align: FxHashMap<String, String> = FxHashMap::default();
    let mut pos: FxHashMap<String, usize> = FxHashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: i64 = -1;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(0));
            let mp = (ws.len() - 1) as f64 / 2.0;
            let lo = mp.floor() as usize;
            let hi = mp.ceil() as usize;
            for w in &ws[lo..=hi] {
                let w_pos = pos.get(w).copied().unwrap_or(0) as i64;
                if align.get(v).is_some_and(|a| a == v)
                    && prev_idx < w_pos
                    && !has_conflict(conflicts, v, w)
                {
                    align.insert(w.clone(), v.clone());
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    root.insert(v.clone(), w_root.clone());
                    align.insert(v.clone(), w_root);
                    prev_idx = w_pos;
                }
            }
        }
    }
    (root, align)
}

type BlockGraph = Graph<(), f64, ()>;

/// Longest-path compaction over the block graph: pass one pushes blocks
/// right to satisfy separation, pass two pulls them back left where slack
/// allows, skipping the borders that must stay put.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    align: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> FxHashMap<String, f64> {
    let mut xs: FxHashMap<String, f64> = FxHashMap::default();
    let block = build_block_graph(g, layering, root, reverse_sep);
    let pinned_border = if reverse_sep {
        BorderKind::Left
    } else {
        BorderKind::Right
    };

    // First pass: assign smallest coordinates while respecting separation.
    let mut stack: Vec<String> = block.node_ids();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(&elem) {
            let x = block.in_edges(&elem, None).into_iter().fold(0.0, |acc, e| {
                let sep = block.edge_by_key(&e).copied().unwrap_or(0.0);
                let prev = xs.get(&e.v).copied().unwrap_or(0.0);
                f64::max(acc, prev + sep)
            });
            xs.insert(elem, x);
        } else {
            visited.insert(elem.clone());
            stack.push(elem.clone());
            stack.extend(block.predecessors(&elem));
        }
    }

    // Second pass: pull blocks toward their successors where possible.
    let mut stack: Vec<String> = block.node_ids();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(&elem) {
            let min = block
                .out_edges(&elem, None)
                .into_iter()
                .fold(f64::INFINITY, |acc, e| {
                    let sep = block.edge_by_key(&e).copied().unwrap_or(0.0);
                    let next = xs.get(&e.w).copied().unwrap_or(0.0);
                    f64::min(acc, next - sep)
                });
            let border = g.node(&elem).and_then(|n| n.border_kind);
            if min != f64::INFINITY && border != Some(pinned_border) {
                let x = xs.entry(elem).or_insert(0.0);
                *x = f64::max(*x, min);
            }
        } else {
            visited.insert(elem.clone());
            stack.push(elem.clone());
            stack.extend(block.successors(&elem));
        }
    }

    for v in align.keys() {
        let x = root.get(v).and_then(|r| xs.get(r)).copied().unwrap_or(0.0);
        xs.insert(v.clone(), x);
    }
    xs
}

// One node per block root; edges carry the maximum separation required
// between horizontally adjacent blocks.
fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> BlockGraph {
    let mut block: BlockGraph = Graph::new(GraphOptions::default());
    let label = g.graph();
    let (nodesep, edgesep) = (label.nodesep, label.edgesep);

    for layer in layering {
        let mut prev: Option<&String> = None;
        for v in layer {
            let v_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
            block.ensure_node(&v_root);
            if let Some(u) = prev {
                let u_root = root.get(u).cloned().unwrap_or_else(|| u.clone());
                let required = separation(g, nodesep, edgesep, reverse_sep, v, u);
                let prev_max = block.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                block.set_edge(u_root, v_root, f64::max(required, prev_max));
            }
            prev = Some(v);
        }
    }
    block
}

// Minimum horizontal distance between the centers of v and its left
// neighbor w, honoring label placement on edge-label dummies.
fn separation(
    g: &LayoutGraph,
    nodesep: f64,
    edgesep: f64,
    reverse_sep: bool,
    v: &str,
    w: &str,
) -> f64 {
    let v_label = g.node(v).cloned().unwrap_or_default();
    let w_label = g.node(w).cloned().unwrap_or_default();
    let mut sum = v_label.width / 2.0;

    let mut delta = match v_label.labelpos {
        Some(LabelPos::L) => -v_label.width / 2.0,
        Some(LabelPos::R) => v_label.width / 2.0,
        _ => 0.0,
    };
    if delta != 0.0 {
        sum += if reverse_sep { delta } else { -delta };
    }

    sum += if v_label.dummy.is_some() { edgesep } else { nodesep } / 2.0;
    sum += if w_label.dummy.is_some() { edgesep } else { nodesep } / 2.0;
    sum += w_label.width / 2.0;

    delta = match w_label.labelpos {
        Some(LabelPos::L) => w_label.width / 2.0,
        Some(LabelPos::R) => -w_label.width / 2.0,
        _ => 0.0,
    };
    if delta != 0.0 {
        sum += if reverse_sep { delta } else { -delta };
    }
    sum
}

pub fn position_x(g: &LayoutGraph) -> FxHashMap<String, f64> {
    let layering = build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    find_type2_conflicts(g, &layering, &mut conflicts);

    let mut xss: Vec<(Align, FxHashMap<String, f64>)> = Vec::with_capacity(4);
    for vert in ['u', 'd'] {
        let mut adjusted: Vec<Vec<String>> = if vert == 'u' {
            layering.clone()
        } else {
            layering.iter().rev().cloned().collect()
        };
        for horiz in ['l', 'r'] {
            if horiz == 'r' {
                for layer in &mut adjusted {
                    layer.reverse();
                }
            }
            let (root, align) = if vert == 'u' {
                vertical_alignment(&adjusted, &conflicts, |v| g.predecessors(v))
            } else {
                vertical_alignment(&adjusted, &conflicts, |v| g.successors(v))
            };
            let mut xs = horizontal_compaction(g, &adjusted, &root, &align, horiz == 'r');
            if horiz == 'r' {
                for x in xs.values_mut() {
                    *x = -*x;
                }
            }
            let key = match (vert, horiz) {
                ('u', 'l') => Align::UL,
                ('u', 'r') => Align::UR,
                ('d', 'l') => Align::DL,
                _ => Align::DR,
            };
            xss.push((key, xs));
        }
    }

    if let Some(narrowest) = find_smallest_width_alignment(g, &xss) {
        align_coordinates(&mut xss, narrowest);
    }
    balance(&xss, g.graph().align)
}

// Index of the alignment producing the narrowest drawing.
fn find_smallest_width_alignment(
    g: &LayoutGraph,
    xss: &[(Align, FxHashMap<String, f64>)],
) -> Option<usize> {
    let mut best: Option<(f64, usize)> = None;
    for (idx, (_, xs)) in xss.iter().enumerate() {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half_width = g.node(v).map(|n| n.width).unwrap_or(0.0) / 2.0;
            max = f64::max(max, x + half_width);
            min = f64::min(min, x - half_width);
        }
        let width = max - min;
        if best.is_none_or(|(bw, _)| width < bw) {
            best = Some((width, idx));
        }
    }
    best.map(|(_, idx)| idx)
}

// Shifts every other alignment so left-biased ones share the narrowest
// alignment's minimum and right-biased ones its maximum.
fn align_coordinates(xss: &mut [(Align, FxHashMap<String, f64>)], align_to: usize) {
    let (align_min, align_max) = {
        let xs = &xss[align_to].1;
        (
            xs.values().copied().fold(f64::INFINITY, f64::min),
            xs.values().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };
    for (idx, (key, xs)) in xss.iter_mut().enumerate() {
        if idx == align_to {
            continue;
        }
        let left_biased = matches!(key, Align::UL | Align::DL);
        let delta = if left_biased {
            align_min - xs.values().copied().fold(f64::INFINITY, f64::min)
        } else {
            align_max - xs.values().copied().fold(f64::NEG_INFINITY, f64::max)
        };
        if delta != 0.0 && delta.is_finite() {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

// Per node: the requested alignment's coordinate, or the mean of the two
// median candidates.
fn balance(xss: &[(Align, FxHashMap<String, f64>)], align: Option<Align>) -> FxHashMap<String, f64> {
    let Some((_, ul)) = xss.first() else {
        return FxHashMap::default();
    };
    let mut out: FxHashMap<String, f64> = FxHashMap::default();
    for v in ul.keys() {
        let x = match align {
            Some(wanted) => xss
                .iter()
                .find(|(key, _)| *key == wanted)
                .and_then(|(_, xs)| xs.get(v))
                .copied()
                .unwrap_or(0.0),
            None => {
                let mut candidates: Vec<f64> = xss
                    .iter()
                    .filter_map(|(_, xs)| xs.get(v).copied())
                    .collect();
                candidates.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                (candidates[1] + candidates[2]) / 2.0
            }
        };
        out.insert(v.clone(), x);
    }
    out
}
