use std::cmp::Ordering;

use crate::order::SortEntry;

/// A sorted run of nodes plus its combined barycenter, fed back to the
/// enclosing subgraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Sorts entries by barycenter, breaking ties by original index (reversed
/// when `bias_right`). Entries without a barycenter keep their original
/// positions, re-inserted as soon as the output index reaches them.
pub fn sort(entries: Vec<SortEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<SortEntry>, Vec<SortEntry>) = entries
        .into_iter()
        .partition(|entry| entry.barycenter.is_some());
    // Descending index, so popping consumes in ascending order.
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let ab = a.barycenter.unwrap_or(0.0);
        let bb = b.barycenter.unwrap_or(0.0);
        ab.partial_cmp(&bb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                if bias_right {
                    b.i.cmp(&a.i)
                } else {
                    a.i.cmp(&b.i)
                }
            })
    });

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = 0usize;

    vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    for entry in sortable {
        vs_index += entry.vs.len();
        vs.extend(entry.vs);
        if let (Some(b), Some(w)) = (entry.barycenter, entry.weight) {
            sum += b * w;
            weight += w;
        }
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }

    let mut result = SortResult {
        vs,
        barycenter: None,
        weight: None,
    };
    if weight > 0.0 {
        result.barycenter = Some(sum / weight);
        result.weight = Some(weight);
    }
    result
}

fn consume_unsortable(
    vs: &mut Vec<String>,
    unsortable: &mut Vec<SortEntry>,
    mut index: usize,
) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(last) = unsortable.pop() {
            vs.extend(last.vs);
            index += 1;
        }
    }
    index
}
