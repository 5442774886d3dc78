//! Weighted crossing count between adjacent layers, via the accumulator-tree
//! method of Barth, Jünger and Mutzel ("Simple and Efficient Bilayer Cross
//! Counting").

use rustc_hash::FxHashMap;

use crate::LayoutGraph;

pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    let mut cc = 0.0;
    for pair in layering.windows(2) {
        cc += two_layer_cross_count(g, &pair[0], &pair[1]);
    }
    cc
}

fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    let south_pos: FxHashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    // Edge endpoints in the south layer, ordered by north position then by
    // south position within each north node.
    let mut entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut row: Vec<(usize, f64)> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
                Some((pos, weight))
            })
            .collect();
        row.sort_by_key(|(pos, _)| *pos);
        entries.extend(row);
    }

    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0.0f64; tree_size];

    let mut cc = 0.0;
    for (pos, weight) in entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}
