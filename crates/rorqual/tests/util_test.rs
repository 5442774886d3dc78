use rorqual::graphlib::{Graph, GraphOptions};
use rorqual::util::{
    IdMinter, Rect, build_layer_matrix, intersect_rect, normalize_ranks, remove_empty_ranks,
    simplify,
};
use rorqual::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, Point};

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
fn intersect_rect_hits_the_side_toward_the_point() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 20.0,
        height: 10.0,
    };
    assert_eq!(
        intersect_rect(rect, Point::new(100.0, 0.0)),
        Some(Point::new(10.0, 0.0))
    );
    assert_eq!(
        intersect_rect(rect, Point::new(-100.0, 0.0)),
        Some(Point::new(-10.0, 0.0))
    );
    assert_eq!(
        intersect_rect(rect, Point::new(0.0, 100.0)),
        Some(Point::new(0.0, 5.0))
    );
    assert_eq!(
        intersect_rect(rect, Point::new(0.0, -100.0)),
        Some(Point::new(0.0, -5.0))
    );
}

#[test]
fn intersect_rect_walks_the_diagonal() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 20.0,
        height: 20.0,
    };
    assert_eq!(
        intersect_rect(rect, Point::new(50.0, 50.0)),
        Some(Point::new(10.0, 10.0))
    );
}

#[test]
fn intersect_rect_is_undefined_at_the_center() {
    let rect = Rect {
        x: 3.0,
        y: 4.0,
        width: 20.0,
        height: 10.0,
    };
    assert_eq!(intersect_rect(rect, Point::new(3.0, 4.0)), None);
}

#[test]
fn layer_matrix_sorts_by_rank_then_order() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 1);
    node_at_rank(&mut g, "c", 1);
    g.node_mut("b").unwrap().order = Some(1);
    g.node_mut("c").unwrap().order = Some(0);

    let layering = build_layer_matrix(&g);
    assert_eq!(layering.len(), 2);
    assert_eq!(layering[0], ["a"]);
    assert_eq!(layering[1], ["c", "b"]);
}

#[test]
fn normalize_ranks_shifts_the_minimum_to_zero() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", -3);
    node_at_rank(&mut g, "b", 2);

    normalize_ranks(&mut g);
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(5));
}

#[test]
fn remove_empty_ranks_closes_unprotected_gaps() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 4);
    g.graph_mut().node_rank_factor = Some(4);

    remove_empty_ranks(&mut g);
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(1));
}

#[test]
fn remove_empty_ranks_keeps_multiples_of_the_factor() {
    let mut g = new_graph();
    node_at_rank(&mut g, "a", 0);
    node_at_rank(&mut g, "b", 4);
    g.graph_mut().node_rank_factor = Some(2);

    remove_empty_ranks(&mut g);
    // Ranks 1 and 3 collapse; the empty rank 2 is on the factor grid and
    // survives as rank 1.
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(2));
}

#[test]
fn simplify_collapses_parallel_edges() {
    let mut g = new_graph();
    g.set_edge_named("a", "b", None, Some(EdgeLabel::weighted(1.0, 1)));
    g.set_edge_named("a", "b", Some("x".to_string()), Some(EdgeLabel::weighted(2.0, 3)));

    let simple = simplify(&g);
    assert_eq!(simple.edge_count(), 1);
    let label = simple.edge("a", "b", None).unwrap();
    assert_eq!(label.weight, 3.0);
    assert_eq!(label.minlen, 3);
}

#[test]
fn minted_ids_never_collide_with_existing_nodes() {
    let mut g = new_graph();
    g.set_node("_d1", NodeLabel::default());
    let mut ids = IdMinter::new();
    let id = ids.node_id(&g, "_d");
    assert_ne!(id, "_d1");
    assert!(!g.has_node(&id));
    let next = ids.node_id(&g, "_d");
    assert_ne!(id, next);
}
