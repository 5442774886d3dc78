//! Graph traversals and algorithms over [`Graph`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Graph, GraphError};

enum Order {
    Pre,
    Post,
}

/// Nodes reachable from `roots` in preorder. Directed graphs navigate
/// successors, undirected graphs navigate neighbors. A missing root is an
/// error.
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Result<Vec<String>, GraphError>
where
    N: Default,
    E: Default,
{
    dfs(g, roots, Order::Pre)
}

/// Nodes reachable from `roots` in postorder.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Result<Vec<String>, GraphError>
where
    N: Default,
    E: Default,
{
    dfs(g, roots, Order::Post)
}

// Explicit-stack DFS so pathologically deep graphs (long dummy chains) cannot
// overflow the call stack. Visitation matches the recursive formulation: a
// node is visited at most once even when reachable from several roots.
fn dfs<N, E, G>(g: &Graph<N, E, G>, roots: &[&str], order: Order) -> Result<Vec<String>, GraphError>
where
    N: Default,
    E: Default,
{
    let next = |v: &str| -> Vec<String> {
        if g.is_directed() {
            g.successors(v)
        } else {
            g.neighbors(v)
        }
    };
    let mut acc: Vec<String> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    for root in roots {
        if !g.has_node(root) {
            return Err(GraphError::MissingNode(root.to_string()));
        }
        let mut stack: Vec<(String, bool)> = vec![(root.to_string(), false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                acc.push(v);
                continue;
            }
            if !visited.insert(v.clone()) {
                continue;
            }
            match order {
                Order::Pre => acc.push(v.clone()),
                Order::Post => stack.push((v.clone(), true)),
            }
            let mut ws = next(&v);
            ws.reverse();
            for w in ws {
                if !visited.contains(&w) {
                    stack.push((w, false));
                }
            }
        }
    }
    Ok(acc)
}

/// Connected components, ignoring edge direction. Each component lists its
/// nodes in discovery order; components appear in node insertion order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();
    for v in g.node_ids() {
        if visited.contains(&v) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            if !visited.insert(u.clone()) {
                continue;
            }
            component.push(u.clone());
            stack.extend(g.predecessors(&u));
            stack.extend(g.successors(&u));
        }
        out.push(component);
    }
    out
}

/// Strongly connected components (iterative Tarjan).
pub fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    let ids = g.node_ids();
    let index_of: FxHashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();
    let adj: Vec<Vec<usize>> = ids
        .iter()
        .map(|v| {
            g.successors(v)
                .iter()
                .map(|w| index_of[w.as_str()])
                .collect()
        })
        .collect();

    const UNSET: usize = usize::MAX;
    let n = ids.len();
    let mut index = vec![UNSET; n];
    let mut lowlink = vec![UNSET; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;
    let mut sccs: Vec<Vec<String>> = Vec::new();

    for root in 0..n {
        if index[root] != UNSET {
            continue;
        }
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        loop {
            let Some(frame) = frames.last_mut() else {
                break;
            };
            let v = frame.0;
            if frame.1 < adj[v].len() {
                let w = adj[v][frame.1];
                frame.1 += 1;
                if index[w] == UNSET {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                frames.pop();
                if let Some(&mut (u, _)) = frames.last_mut() {
                    lowlink[u] = lowlink[u].min(lowlink[v]);
                }
                // SCC root: pop the component off the node stack.
                if lowlink[v] == index[v] {
                    let mut scc: Vec<String> = Vec::new();
                    loop {
                        let w = stack.pop().unwrap_or(v);
                        on_stack[w] = false;
                        scc.push(ids[w].clone());
                        if w == v {
                            break;
                        }
                    }
                    sccs.push(scc);
                }
            }
        }
    }
    sccs
}

/// Strongly connected components that contain a cycle: more than one node, or
/// a single node with a self-loop.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    tarjan(g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || !g.out_edges(&scc[0], Some(&scc[0])).is_empty())
        .collect()
}
