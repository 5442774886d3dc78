//! Helpers shared across pipeline stages.

use rorqual_graphlib::{Graph, GraphOptions};

use crate::LayoutGraph;
use crate::model::{DummyKind, EdgeLabel, NodeLabel, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where a ray from `point` toward the center of `rect` crosses the rectangle
/// boundary. `None` when the ray starts at the center itself; that direction
/// is undefined and the caller must treat it as an error.
pub fn intersect_rect(rect: Rect, point: Point) -> Option<Point> {
    let x = rect.x;
    let y = rect.y;
    let dx = point.x - x;
    let dy = point.y - y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        // Crossing the top or bottom edge.
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        // Crossing the left or right edge.
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Some(Point::new(x + sx, y + sy))
}

/// Highest rank present in the graph, if any node is ranked.
pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_ids()
        .iter()
        .filter_map(|v| g.node(v).and_then(|n| n.rank))
        .max()
}

/// Layering matrix: node ids indexed by rank, then by intra-rank order.
/// Ranks are expected to be normalized (starting at 0) by the time this is
/// called.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max.max(0) + 1) as usize];
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let Some(rank) = node.rank else { continue };
        if rank < 0 {
            continue;
        }
        layers[rank as usize].push((node.order.unwrap_or(0), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

/// Shifts all ranks so the minimum becomes 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g
        .node_ids()
        .iter()
        .filter_map(|v| g.node(v).and_then(|n| n.rank))
        .min()
    else {
        return;
    };
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            if let Some(rank) = node.rank {
                node.rank = Some(rank - min);
            }
        }
    }
}

/// Closes rank gaps left behind by the nesting expander. Empty ranks on the
/// `node_rank_factor` grid are reserved for cluster borders and stay; empty
/// ranks off the grid are collapsed.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(factor) = g.graph().node_rank_factor else {
        return;
    };
    let ranked: Vec<(String, i32)> = g
        .node_ids()
        .into_iter()
        .filter_map(|v| {
            let rank = g.node(&v).and_then(|n| n.rank)?;
            Some((v, rank))
        })
        .collect();
    let Some(&min) = ranked.iter().map(|(_, r)| r).min() else {
        return;
    };
    let Some(&max) = ranked.iter().map(|(_, r)| r).max() else {
        return;
    };
    let size = (max - min) as usize;
    if size == 0 {
        return;
    }
    let mut layers: Vec<Vec<&String>> = vec![Vec::new(); size + 1];
    for (v, rank) in &ranked {
        layers[(rank - min) as usize].push(v);
    }
    let factor = factor.max(1);
    let mut delta: i32 = 0;
    for (i, vs) in layers.iter().enumerate() {
        if vs.is_empty() && (i as i32) % factor != 0 {
            delta -= 1;
        } else if delta != 0 {
            for v in vs {
                if let Some(node) = g.node_mut(v) {
                    if let Some(rank) = node.rank {
                        node.rank = Some(rank + delta);
                    }
                }
            }
        }
    }
}

/// Flattened view: only leaf nodes, every edge, no hierarchy.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut flat: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.options().multigraph,
        compound: false,
        ..Default::default()
    });
    flat.set_graph(g.graph().clone());
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            if let Some(label) = g.node(&v) {
                flat.set_node(v, label.clone());
            }
        }
    }
    for e in g.edge_keys() {
        if let Some(label) = g.edge_by_key(&e) {
            flat.set_edge_named(e.v, e.w, e.name, Some(label.clone()));
        }
    }
    flat
}

/// Collapses parallel edges into simple ones, summing weights and keeping the
/// largest minlen. Drops hierarchy and names.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simple: LayoutGraph = Graph::new(GraphOptions::default());
    simple.set_graph(g.graph().clone());
    for v in g.node_ids() {
        if let Some(label) = g.node(&v) {
            simple.set_node(v, label.clone());
        }
    }
    for e in g.edge_keys() {
        let Some(label) = g.edge_by_key(&e) else {
            continue;
        };
        let (weight, minlen) = match simple.edge(&e.v, &e.w, None) {
            Some(existing) => (existing.weight + label.weight, existing.minlen.max(label.minlen)),
            None => (label.weight, label.minlen),
        };
        simple.set_edge(e.v.clone(), e.w.clone(), EdgeLabel::weighted(weight, minlen));
    }
    simple
}

/// Synthetic-id source owned by one layout call. Independent concurrent
/// layouts never share or collide on ids.
#[derive(Debug, Default)]
pub struct IdMinter {
    next: usize,
}

impl IdMinter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> usize {
        self.next += 1;
        self.next
    }

    /// Next `prefix{n}` id not already used by a node of `g`.
    pub fn node_id<N, E, G>(&mut self, g: &Graph<N, E, G>, prefix: &str) -> String
    where
        N: Default,
        E: Default,
    {
        loop {
            let candidate = format!("{prefix}{}", self.bump());
            if !g.has_node(&candidate) {
                return candidate;
            }
        }
    }

    /// Next `prefix{n}` name not used by an existing `v -> w` edge.
    pub fn edge_name<N, E, G>(
        &mut self,
        g: &Graph<N, E, G>,
        v: &str,
        w: &str,
        prefix: &str,
    ) -> String
    where
        N: Default,
        E: Default,
    {
        loop {
            let candidate = format!("{prefix}{}", self.bump());
            if !g.has_edge(v, w, Some(&candidate)) {
                return candidate;
            }
        }
    }
}

/// Inserts a tagged synthetic node and returns its freshly minted id.
pub fn add_dummy_node(
    g: &mut LayoutGraph,
    kind: DummyKind,
    mut label: NodeLabel,
    prefix: &str,
    ids: &mut IdMinter,
) -> String {
    let v = ids.node_id(g, prefix);
    label.dummy = Some(kind);
    g.set_node(v.clone(), label);
    v
}
