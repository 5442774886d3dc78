use rorqual::graphlib::{Graph, GraphOptions, alg};
use rorqual::greedy_fas::greedy_fas;
use rorqual::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn weighted(g: &mut LayoutGraph, v: &str, w: &str, weight: f64) {
    g.set_edge(v, w, EdgeLabel::weighted(weight, 1));
}

#[test]
fn returns_nothing_for_an_empty_graph() {
    let g = new_graph();
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn returns_nothing_for_a_dag() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c", EdgeLabel::default());
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn removing_the_returned_edges_makes_the_graph_acyclic() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c", "a"]);
    g.set_path(&["c", "d", "c"]);

    let fas = greedy_fas(&g);
    assert!(!fas.is_empty());
    for e in &fas {
        g.remove_edge_key(e);
    }
    assert_eq!(alg::find_cycles(&g), Vec::<Vec<String>>::new());
}

#[test]
fn prefers_breaking_the_lighter_direction() {
    let mut g = new_graph();
    // The heavy cycle edges should survive, the light back edge should go.
    weighted(&mut g, "a", "b", 5.0);
    weighted(&mut g, "b", "c", 5.0);
    weighted(&mut g, "c", "a", 1.0);

    let fas = greedy_fas(&g);
    assert_eq!(fas.len(), 1);
    assert_eq!((fas[0].v.as_str(), fas[0].w.as_str()), ("c", "a"));
}

#[test]
fn handles_multiple_parallel_edges() {
    let mut g = new_graph();
    weighted(&mut g, "a", "b", 3.0);
    g.set_edge_named("b", "a", None, Some(EdgeLabel::weighted(1.0, 1)));
    g.set_edge_named(
        "b",
        "a",
        Some("alt".to_string()),
        Some(EdgeLabel::weighted(1.0, 1)),
    );

    let mut fas = greedy_fas(&g);
    for e in &fas {
        g.remove_edge_key(e);
    }
    assert_eq!(alg::find_cycles(&g), Vec::<Vec<String>>::new());
    // Both parallel back edges must be in the set; the heavier forward edge
    // stays.
    fas.sort();
    assert_eq!(fas.len(), 2);
    assert!(fas.iter().all(|e| e.v == "b" && e.w == "a"));
}
