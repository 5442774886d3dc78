//! Constraint resolution ahead of sorting (Forster, "A Fast and Simple
//! Heuristic for Constrained Two-Level Crossing Reduction").
//!
//! Entries whose barycenters would violate a left-to-right constraint are
//! coalesced into one entry carrying the combined barycenter, so the sort
//! can never reorder them.

use rustc_hash::FxHashMap;

use crate::order::{BarycenterEntry, ConstraintGraph};

/// One sortable unit: either a single node or a coalesced run of nodes that
/// must stay in the given relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    /// Original position, used to break ties and to re-insert entries with
    /// no barycenter.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

struct Mapped {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

pub fn resolve_conflicts(entries: Vec<BarycenterEntry>, cg: &ConstraintGraph) -> Vec<SortEntry> {
    let mut arena: Vec<Mapped> = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| Mapped {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![entry.v],
            i,
            barycenter: entry.barycenter,
            weight: entry.weight,
            merged: false,
        })
        .collect();
    let index: FxHashMap<String, usize> = arena
        .iter()
        .enumerate()
        .map(|(idx, m)| (m.vs[0].clone(), idx))
        .collect();

    let constraint_pairs: Vec<(usize, usize)> = cg
        .edges()
        .filter_map(|e| Some((*index.get(e.v.as_str())?, *index.get(e.w.as_str())?)))
        .collect();
    for (vi, wi) in constraint_pairs {
        arena[wi].indegree += 1;
        arena[vi].outs.push(wi);
    }

    let mut source_set: Vec<usize> = (0..arena.len())
        .filter(|&idx| arena[idx].indegree == 0)
        .collect();
    let mut processed: Vec<usize> = Vec::new();

    while let Some(vi) = source_set.pop() {
        processed.push(vi);
        let mut ins = std::mem::take(&mut arena[vi].ins);
        ins.reverse();
        for ui in ins {
            if arena[ui].merged {
                continue;
            }
            let violates = match (arena[ui].barycenter, arena[vi].barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if violates {
                merge(&mut arena, vi, ui);
            }
        }
        let outs = arena[vi].outs.clone();
        for wi in outs {
            arena[wi].ins.push(vi);
            arena[wi].indegree -= 1;
            if arena[wi].indegree == 0 {
                source_set.push(wi);
            }
        }
    }

    let mut out: Vec<SortEntry> = Vec::with_capacity(processed.len());
    for idx in processed {
        if arena[idx].merged {
            continue;
        }
        let m = &mut arena[idx];
        out.push(SortEntry {
            vs: std::mem::take(&mut m.vs),
            i: m.i,
            barycenter: m.barycenter,
            weight: m.weight,
        });
    }
    out
}

// Folds `source` into `target`; the source's nodes come first.
fn merge(arena: &mut [Mapped], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    if let (Some(b), Some(w)) = (arena[target].barycenter, arena[target].weight) {
        sum += b * w;
        weight += w;
    }
    if let (Some(b), Some(w)) = (arena[source].barycenter, arena[source].weight) {
        sum += b * w;
        weight += w;
    }
    let mut vs = std::mem::take(&mut arena[source].vs);
    let source_i = arena[source].i;
    arena[source].merged = true;

    vs.extend(std::mem::take(&mut arena[target].vs));
    let t = &mut arena[target];
    t.vs = vs;
    if weight > 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    } else {
        t.barycenter = None;
        t.weight = None;
    }
    t.i = t.i.min(source_i);
}
