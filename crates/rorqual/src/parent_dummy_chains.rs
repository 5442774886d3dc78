//! Assigns each dummy node on a normalized edge chain to the cluster it
//! passes through, so border segments can be routed around it.
//!
//! The chain's endpoints determine a path through the cluster forest: up from
//! the tail to the lowest common ancestor, then down to the head. Each dummy
//! is parented to the path element whose rank span covers the dummy's rank.

use rustc_hash::FxHashMap;

use rorqual_graphlib::GraphError;

use crate::LayoutGraph;

pub fn parent_dummy_chains(g: &mut LayoutGraph) -> Result<(), GraphError> {
    let nums = postorder_numbers(g);
    let chains = g.graph().dummy_chains.clone();

    for mut v in chains {
        let Some(key) = g.node(&v).and_then(|n| n.edge_obj.clone()) else {
            continue;
        };
        let (path, lca) = find_path(g, &nums, &key.v, &key.w);
        let mut path_idx = 0usize;
        let mut ascending = true;

        while v != key.w {
            let node_rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);

            if ascending {
                while path_idx < path.len() && path[path_idx] != lca {
                    let covers = path[path_idx]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.max_rank);
                    if !matches!(covers, Some(max) if max < node_rank) {
                        break;
                    }
                    path_idx += 1;
                }
                if path_idx < path.len() && path[path_idx] == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len() {
                    let covers = path[path_idx + 1]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.min_rank);
                    if matches!(covers, Some(min) if min <= node_rank) {
                        path_idx += 1;
                    } else {
                        break;
                    }
                }
            }

            let parent = path.get(path_idx).cloned().flatten();
            g.set_parent(&v, parent.as_deref())?;

            match g.successors(&v).into_iter().next() {
                Some(next) => v = next,
                None => break,
            }
        }
    }
    Ok(())
}

// Postorder low/lim numbering of the cluster forest, used for O(1) lowest
// common ancestor checks via interval containment. Iterative, so nesting
// depth is not limited by the call stack.
fn postorder_numbers(g: &LayoutGraph) -> FxHashMap<String, (usize, usize)> {
    enum Frame {
        Enter(String),
        Leave { v: String, low: usize },
    }

    let mut out = FxHashMap::default();
    let mut lim = 0usize;
    let mut stack: Vec<Frame> = g
        .root_children()
        .into_iter()
        .rev()
        .map(Frame::Enter)
        .collect();
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(v) => {
                let children = g.children(&v);
                stack.push(Frame::Leave { v, low: lim });
                for child in children.into_iter().rev() {
                    stack.push(Frame::Enter(child));
                }
            }
            Frame::Leave { v, low } => {
                out.insert(v, (low, lim));
                lim += 1;
            }
        }
    }
    out
}

// Path from v's parent chain up to the lowest common ancestor, then down the
// reversed parent chain of w. `None` stands for the forest root.
fn find_path(
    g: &LayoutGraph,
    nums: &FxHashMap<String, (usize, usize)>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let bounds = |id: &str| nums.get(id).copied().unwrap_or((0, 0));
    let (v_low, v_lim) = bounds(v);
    let (w_low, w_lim) = bounds(w);
    let low = v_low.min(w_low);
    let lim = v_lim.max(w_lim);

    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut parent = Some(v.to_string());
    loop {
        parent = parent.and_then(|p| g.parent(&p).map(str::to_string));
        v_path.push(parent.clone());
        match &parent {
            Some(p) => {
                let (p_low, p_lim) = bounds(p);
                if p_low <= low && lim <= p_lim {
                    break;
                }
            }
            None => break,
        }
    }
    let lca = parent;

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut p = Some(w.to_string());
    loop {
        p = p.and_then(|x| g.parent(&x).map(str::to_string));
        if p == lca || p.is_none() {
            break;
        }
        w_path.push(p.clone());
    }
    w_path.reverse();
    v_path.extend(w_path);
    (v_path, lca)
}
