use rorqual::graphlib::{Graph, GraphOptions};
use rorqual::util::IdMinter;
use rorqual::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, nesting};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

#[test]
fn connects_a_disconnected_graph_through_the_root() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel::default());
    g.set_node("b", NodeLabel::default());
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    let root = g.graph().nesting_root.clone().unwrap();
    assert!(g.has_node(&root));
    assert!(g.has_edge(&root, "a", None));
    assert!(g.has_edge(&root, "b", None));
}

#[test]
fn adds_border_nodes_around_cluster_contents() {
    let mut g = new_graph();
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_parent("b", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    let sg = g.node("sg").unwrap();
    let top = sg.border_top.clone().unwrap();
    let bottom = sg.border_bottom.clone().unwrap();
    assert_eq!(g.parent(&top), Some("sg"));
    assert_eq!(g.parent(&bottom), Some("sg"));
    assert!(g.has_edge(&top, "b", None));
    assert!(g.has_edge("b", &bottom, None));
}

#[test]
fn scales_minlen_so_plain_nodes_avoid_border_ranks() {
    let mut g = new_graph();
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_parent("b", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    // Depth of the forest is 2, so the scale factor is 2 * (2 - 1) + 1 = 3.
    assert_eq!(g.edge("a", "b", None).unwrap().minlen, 3);
    assert_eq!(g.graph().node_rank_factor, Some(3));
}

#[test]
fn nesting_edges_pull_cluster_contents_together() {
    let mut g = new_graph();
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_parent("b", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    let sg = g.node("sg").unwrap();
    let top = sg.border_top.clone().unwrap();
    let down = g.edge(&top, "b", None).unwrap();
    assert!(down.nesting_edge);
    // Total input weight is 1, so contents are tied with weight 2 * (1 + 1).
    assert_eq!(down.weight, 4.0);
    assert_eq!(down.minlen, 1);
}

#[test]
fn ties_top_level_clusters_to_the_root() {
    let mut g = new_graph();
    g.set_parent("b", Some("sg")).unwrap();
    g.set_node("a", NodeLabel::default());
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    let root = g.graph().nesting_root.clone().unwrap();
    let top = g.node("sg").unwrap().border_top.clone().unwrap();
    let tie = g.edge(&root, &top, None).unwrap();
    assert_eq!(tie.weight, 0.0);
    // height + depth of the cluster = 1 + 1.
    assert_eq!(tie.minlen, 2);
}

#[test]
fn expands_very_deeply_nested_clusters() {
    let mut g = new_graph();
    g.set_parent("leaf", Some("c0")).unwrap();
    let depth: i32 = 50_000;
    for i in 0..depth {
        let parent = format!("c{}", i + 1);
        g.set_parent(&format!("c{i}"), Some(parent.as_str())).unwrap();
    }
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    // The forest is depth + 2 deep, so the scale factor is 2 * (depth + 1) + 1.
    assert_eq!(g.graph().node_rank_factor, Some(2 * (depth + 1) + 1));
    assert!(g.node("c0").unwrap().border_top.is_some());
}

#[test]
fn cleanup_removes_the_root_and_every_nesting_edge() {
    let mut g = new_graph();
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_parent("b", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    nesting::run(&mut g, &mut ids).unwrap();
    nesting::cleanup(&mut g);

    assert!(g.graph().nesting_root.is_none());
    for e in g.edge_keys() {
        assert!(!g.edge_by_key(&e).unwrap().nesting_edge);
    }
    // The scaled structural edge survives.
    assert!(g.has_edge("a", "b", None));
    // node_rank_factor stays for empty-rank removal.
    assert_eq!(g.graph().node_rank_factor, Some(3));
}
