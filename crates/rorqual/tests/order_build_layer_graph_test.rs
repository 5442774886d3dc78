use rorqual::graphlib::{Graph, GraphOptions};
use rorqual::order::{Relationship, build_layer_graph};
use rorqual::util::IdMinter;
use rorqual::{BorderKind, EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

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

fn node_at_rank(g: &mut LayoutGraph, v: &str, rank: i32) {
    g.set_node(v, NodeLabel::default());
    g.node_mut(v).unwrap().rank = Some(rank);
}

#[test]
fn gathers_the_movable_rank_under_a_synthetic_root() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    node_at_rank(&mut g, "c", 1);
    g.set_edge("a", "b", EdgeLabel::default());
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, &mut ids);
    let root = lg.graph().root.clone();
    assert!(lg.has_node(&root));
    assert_eq!(lg.parent("b"), Some(root.as_str()));
    assert_eq!(lg.parent("c"), Some(root.as_str()));
    // The fixed endpoint comes along but stays outside the hierarchy.
    assert!(lg.has_node("a"));
    assert_eq!(lg.parent("a"), None);
    assert!(lg.has_edge("a", "b", None));
}

#[test]
fn edges_always_point_at_the_movable_layer() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    g.set_edge("a", "b", EdgeLabel::default());
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 0, Relationship::OutEdges, &mut ids);
    // Upward sweep: the rank-1 endpoint feeds into the rank-0 node.
    assert!(lg.has_edge("b", "a", None));
    assert!(!lg.has_edge("a", "b", None));
}

#[test]
fn collapses_parallel_edges_by_summing_weights() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    g.set_edge_named("a", "b", None, Some(EdgeLabel::weighted(2.0, 1)));
    g.set_edge_named("a", "b", Some("x".to_string()), Some(EdgeLabel::weighted(3.0, 1)));
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, &mut ids);
    assert_eq!(lg.edge("a", "b", None).unwrap().weight, 5.0);
}

#[test]
fn fixed_endpoints_carry_their_current_order() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    g.node_mut("a").unwrap().order = Some(7);
    g.set_edge("a", "b", EdgeLabel::default());
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, &mut ids);
    assert_eq!(lg.node("a").unwrap().order, Some(7));
}

#[test]
fn clusters_spanning_the_rank_join_with_their_border_handles() {
    let mut g = new_graph();
    node_at_rank(&mut g, "b", 1);
    g.set_parent("b", Some("sg")).unwrap();
    {
        let sg = g.node_mut("sg").unwrap();
        sg.min_rank = Some(0);
        sg.max_rank = Some(1);
        sg.set_border_at(BorderKind::Left, 1, "bl1".to_string());
        sg.set_border_at(BorderKind::Right, 1, "br1".to_string());
    }
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, &mut ids);
    assert!(lg.has_node("sg"));
    let sg = lg.node("sg").unwrap();
    assert_eq!(sg.border_left.as_deref(), Some("bl1"));
    assert_eq!(sg.border_right.as_deref(), Some("br1"));
    assert_eq!(lg.parent("b"), Some("sg"));
}

#[test]
fn leaves_other_ranks_out() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    node_at_rank(&mut g, "c", 2);
    g.set_path(&["a", "b", "c"]);
    let mut ids = IdMinter::new();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, &mut ids);
    assert!(!lg.has_node("c"));
}
