//! Recursive sort of one subgraph within a layer.

use rustc_hash::FxHashMap;

use crate::order::{
    BarycenterEntry, ConstraintGraph, LayerGraph, SortEntry, SortResult, barycenter,
    resolve_conflicts, sort,
};

/// Sorts the children of `v` in the layer graph, recursing into nested
/// subgraphs and folding their results in as single units. A cluster's
/// border dummies are pinned to the outside of its run, and pull its
/// barycenter toward their own predecessors.
///
/// Recursion depth here is the cluster nesting depth of one layer, not the
/// graph's node count.
pub fn sort_subgraph(
    lg: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    bias_right: bool,
) -> SortResult {
    let mut movable = lg.children(v);
    let (bl, br) = match lg.node(v) {
        Some(node) => (node.border_left.clone(), node.border_right.clone()),
        None => (None, None),
    };
    if bl.is_some() {
        movable.retain(|w| Some(w) != bl.as_ref() && Some(w) != br.as_ref());
    }

    let mut entries = barycenter(lg, &movable);
    let mut subgraphs: FxHashMap<String, SortResult> = FxHashMap::default();
    for entry in &mut entries {
        if !lg.children(&entry.v).is_empty() {
            let result = sort_subgraph(lg, &entry.v, cg, bias_right);
            if result.barycenter.is_some() {
                merge_barycenters(entry, &result);
            }
            subgraphs.insert(entry.v.clone(), result);
        }
    }

    let mut resolved = resolve_conflicts(entries, cg);
    expand_subgraphs(&mut resolved, &subgraphs);

    let mut result = sort(resolved, bias_right);

    if let (Some(bl), Some(br)) = (bl, br) {
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl.clone());
        vs.append(&mut result.vs);
        vs.push(br.clone());
        result.vs = vs;

        if let Some(bl_pred) = lg.predecessors(&bl).first() {
            let bl_order = lg.node(bl_pred).and_then(|n| n.order).unwrap_or(0) as f64;
            let br_order = lg
                .predecessors(&br)
                .first()
                .and_then(|p| lg.node(p))
                .and_then(|n| n.order)
                .unwrap_or(0) as f64;
            let b = result.barycenter.unwrap_or(0.0);
            let w = result.weight.unwrap_or(0.0);
            result.barycenter = Some((b * w + bl_order + br_order) / (w + 2.0));
            result.weight = Some(w + 2.0);
        }
    }
    result
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let ob = other.barycenter.unwrap_or(0.0);
    let ow = other.weight.unwrap_or(0.0);
    match (target.barycenter, target.weight) {
        (Some(b), Some(w)) => {
            target.barycenter = Some((b * w + ob * ow) / (w + ow));
            target.weight = Some(w + ow);
        }
        _ => {
            target.barycenter = other.barycenter;
            target.weight = other.weight;
        }
    }
}

// Replaces each nested subgraph's name with its sorted member run.
fn expand_subgraphs(entries: &mut [SortEntry], subgraphs: &FxHashMap<String, SortResult>) {
    for entry in entries {
        let mut vs = Vec::with_capacity(entry.vs.len());
        for v in entry.vs.drain(..) {
            match subgraphs.get(&v) {
                Some(sub) => vs.extend(sub.vs.iter().cloned()),
                None => vs.push(v),
            }
        }
        entry.vs = vs;
    }
}
