use crate::order::LayerGraph;

/// A movable node with the weighted mean position of its fixed-layer
/// neighbors, or no barycenter at all when it has none.
#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

pub fn barycenter(lg: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let ins = lg.in_edges(v, None);
            if ins.is_empty() {
                return BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                };
            }
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in ins {
                let edge_weight = lg.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
                let order = lg.node(&e.v).and_then(|n| n.order).unwrap_or(0);
                sum += edge_weight * order as f64;
                weight += edge_weight;
            }
            BarycenterEntry {
                v: v.clone(),
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}
