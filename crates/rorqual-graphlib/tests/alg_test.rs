use rorqual_graphlib::{Graph, GraphOptions, alg};

type TestGraph = Graph<(), (), ()>;

fn directed() -> TestGraph {
    Graph::new(GraphOptions::default())
}

#[test]
fn preorder_visits_parents_before_children() {
    let mut g = directed();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d", ());
    let vs = alg::preorder(&g, &["a"]).unwrap();
    assert_eq!(vs, vec!["a", "b", "c", "d"]);
}

#[test]
fn postorder_visits_children_before_parents() {
    let mut g = directed();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d", ());
    let vs = alg::postorder(&g, &["a"]).unwrap();
    assert_eq!(vs, vec!["c", "b", "d", "a"]);
}

#[test]
fn traversal_from_a_missing_root_is_an_error() {
    let g = directed();
    assert!(alg::preorder(&g, &["nope"]).is_err());
}

#[test]
fn traversal_visits_each_node_once_across_roots() {
    let mut g = directed();
    g.set_edge("a", "c", ());
    g.set_edge("b", "c", ());
    let vs = alg::preorder(&g, &["a", "b"]).unwrap();
    assert_eq!(vs, vec!["a", "c", "b"]);
}

#[test]
fn undirected_traversal_crosses_edges_both_ways() {
    let mut g: TestGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    g.set_edge("a", "b", ());
    g.set_edge("b", "c", ());
    let vs = alg::preorder(&g, &["c"]).unwrap();
    assert_eq!(vs, vec!["c", "b", "a"]);
}

#[test]
fn components_ignore_edge_direction() {
    let mut g = directed();
    g.set_edge("a", "b", ());
    g.set_edge("c", "b", ());
    g.set_edge("d", "e", ());
    g.set_node("f", ());

    let mut comps: Vec<Vec<String>> = alg::components(&g)
        .into_iter()
        .map(|mut c| {
            c.sort();
            c
        })
        .collect();
    comps.sort();
    assert_eq!(
        comps,
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string()],
            vec!["f".to_string()],
        ]
    );
}

#[test]
fn tarjan_finds_strongly_connected_components() {
    let mut g = directed();
    g.set_path(&["a", "b", "c", "a"]);
    g.set_edge("c", "d", ());

    let mut sccs: Vec<Vec<String>> = alg::tarjan(&g)
        .into_iter()
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();
    sccs.sort();
    assert_eq!(
        sccs,
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
        ]
    );
}

#[test]
fn find_cycles_skips_trivial_components() {
    let mut g = directed();
    g.set_path(&["a", "b", "a"]);
    g.set_edge("c", "d", ());

    let mut cycles: Vec<Vec<String>> = alg::find_cycles(&g)
        .into_iter()
        .map(|mut c| {
            c.sort();
            c
        })
        .collect();
    cycles.sort();
    assert_eq!(cycles, vec![vec!["a".to_string(), "b".to_string()]]);
}

#[test]
fn find_cycles_reports_self_loops() {
    let mut g: TestGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge("a", "a", ());
    assert_eq!(alg::find_cycles(&g), vec![vec!["a".to_string()]]);
}
