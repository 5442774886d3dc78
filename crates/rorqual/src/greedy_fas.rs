//! Greedy feedback arc set, after Eades, Lin and Smyth, "A fast and effective
//! heuristic for the feedback arc set problem".
//!
//! Nodes live in buckets keyed by out-weight minus in-weight. Sinks and
//! sources are peeled off eagerly; when neither exists the node with the
//! largest difference is removed and its remaining in-edges collected as
//! feedback arcs.

use rustc_hash::FxHashMap;

use rorqual_graphlib::EdgeKey;

use crate::LayoutGraph;

pub fn greedy_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    if g.node_count() <= 1 {
        return Vec::new();
    }
    let state = State::build(g);
    let arcs = state.run();
    // Expand aggregated arcs back into the underlying multi-edges.
    let mut fas: Vec<EdgeKey> = Vec::new();
    for (v, w) in arcs {
        fas.extend(g.out_edges(&v, Some(&w)));
    }
    fas
}

fn edge_weight(g: &LayoutGraph, e: &EdgeKey) -> i64 {
    let weight = g.edge_by_key(e).map(|label| label.weight).unwrap_or(0.0);
    if weight.is_finite() {
        weight.round() as i64
    } else {
        0
    }
}

struct State {
    ids: Vec<String>,
    // Aggregated simple-edge weights and unique adjacency.
    weights: FxHashMap<(usize, usize), i64>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
    out_w: Vec<i64>,
    in_w: Vec<i64>,
    removed: Vec<bool>,
    bucket_of: Vec<usize>,
    // Stale entries are skipped on dequeue; the live position of a node is
    // tracked in `bucket_of`.
    buckets: Vec<Vec<usize>>,
    zero_idx: usize,
    live: usize,
}

impl State {
    fn build(g: &LayoutGraph) -> Self {
        let ids = g.node_ids();
        let index_of: FxHashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let n = ids.len();
        let mut weights: FxHashMap<(usize, usize), i64> = FxHashMap::default();
        let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut out_w = vec![0i64; n];
        let mut in_w = vec![0i64; n];
        let mut max_out = 0i64;
        let mut max_in = 0i64;
        for e in g.edge_keys() {
            let v = index_of[e.v.as_str()];
            let w = index_of[e.w.as_str()];
            let weight = edge_weight(g, &e);
            let slot = weights.entry((v, w)).or_insert(0);
            if *slot == 0 {
                out_adj[v].push(w);
                in_adj[w].push(v);
            }
            *slot += weight;
            out_w[v] += weight;
            in_w[w] += weight;
            max_out = max_out.max(out_w[v]);
            max_in = max_in.max(in_w[w]);
        }
        let zero_idx = (max_in + 1) as usize;
        let bucket_count = (max_out + max_in + 3) as usize;
        let mut state = Self {
            ids,
            weights,
            out_adj,
            in_adj,
            out_w,
            in_w,
            removed: vec![false; n],
            bucket_of: vec![0; n],
            buckets: vec![Vec::new(); bucket_count],
            zero_idx,
            live: n,
        };
        for v in 0..n {
            state.assign_bucket(v);
        }
        state
    }

    fn assign_bucket(&mut self, v: usize) {
        let idx = if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            self.buckets.len() - 1
        } else {
            (self.out_w[v] - self.in_w[v] + self.zero_idx as i64) as usize
        };
        self.bucket_of[v] = idx;
        self.buckets[idx].push(v);
    }

    fn dequeue(&mut self, idx: usize) -> Option<usize> {
        while let Some(v) = self.buckets[idx].pop() {
            if !self.removed[v] && self.bucket_of[v] == idx {
                return Some(v);
            }
        }
        None
    }

    fn remove_node(&mut self, v: usize, arcs: Option<&mut Vec<(String, String)>>) {
        self.removed[v] = true;
        self.live -= 1;
        let preds: Vec<usize> = self.in_adj[v]
            .iter()
            .copied()
            .filter(|&u| !self.removed[u])
            .collect();
        if let Some(arcs) = arcs {
            for &u in &preds {
                arcs.push((self.ids[u].clone(), self.ids[v].clone()));
            }
        }
        for u in preds {
            self.out_w[u] -= self.weights[&(u, v)];
            self.assign_bucket(u);
        }
        let sucs: Vec<usize> = self.out_adj[v]
            .iter()
            .copied()
            .filter(|&w| !self.removed[w])
            .collect();
        for w in sucs {
            self.in_w[w] -= self.weights[&(v, w)];
            self.assign_bucket(w);
        }
    }

    fn run(mut self) -> Vec<(String, String)> {
        let mut arcs: Vec<(String, String)> = Vec::new();
        let last = self.buckets.len() - 1;
        while self.live > 0 {
            while let Some(sink) = self.dequeue(0) {
                self.remove_node(sink, None);
            }
            while let Some(source) = self.dequeue(last) {
                self.remove_node(source, None);
            }
            if self.live > 0 {
                for idx in (1..last).rev() {
                    if let Some(v) = self.dequeue(idx) {
                        self.remove_node(v, Some(&mut arcs));
                        break;
                    }
                }
            }
        }
        arcs
    }
}
