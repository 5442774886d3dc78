use rorqual::border::add_border_segments;
use rorqual::graphlib::{Graph, GraphOptions};
use rorqual::util::IdMinter;
use rorqual::{BorderKind, DummyKind, EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

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

fn cluster(g: &mut LayoutGraph, sg: &str, min_rank: i32, max_rank: i32) {
    g.set_node(sg, NodeLabel::default());
    let node = g.node_mut(sg).unwrap();
    node.min_rank = Some(min_rank);
    node.max_rank = Some(max_rank);
}

#[test]
fn plain_nodes_get_no_borders() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel::default());
    let mut ids = IdMinter::new();

    add_border_segments(&mut g, &mut ids).unwrap();
    assert_eq!(g.node_count(), 1);
}

#[test]
fn walks_very_deep_nesting_without_spans() {
    let mut g = new_graph();
    for i in 0..50_000 {
        let parent = format!("c{}", i + 1);
        g.set_parent(&format!("c{i}"), Some(parent.as_str())).unwrap();
    }
    let before = g.node_count();
    let mut ids = IdMinter::new();

    add_border_segments(&mut g, &mut ids).unwrap();
    // No cluster has a rank span yet, so nothing is added.
    assert_eq!(g.node_count(), before);
}

#[test]
fn adds_one_border_pair_per_covered_rank() {
    let mut g = new_graph();
    cluster(&mut g, "sg", 1, 3);
    g.set_parent("a", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    add_border_segments(&mut g, &mut ids).unwrap();
    let sg = g.node("sg").unwrap().clone();
    for rank in 1..=3 {
        for kind in [BorderKind::Left, BorderKind::Right] {
            let id = sg.border_at(kind, rank as usize).unwrap().to_string();
            let border = g.node(&id).unwrap();
            assert_eq!(border.dummy, Some(DummyKind::Border));
            assert_eq!(border.rank, Some(rank));
            assert_eq!(border.border_kind, Some(kind));
            assert_eq!(g.parent(&id), Some("sg"));
        }
    }
}

#[test]
fn chains_consecutive_borders_on_each_side() {
    let mut g = new_graph();
    cluster(&mut g, "sg", 0, 2);
    g.set_parent("a", Some("sg")).unwrap();
    let mut ids = IdMinter::new();

    add_border_segments(&mut g, &mut ids).unwrap();
    let sg = g.node("sg").unwrap().clone();
    for kind in [BorderKind::Left, BorderKind::Right] {
        for rank in 1..=2usize {
            let prev = sg.border_at(kind, rank - 1).unwrap();
            let curr = sg.border_at(kind, rank).unwrap();
            assert!(g.has_edge(prev, curr, None));
        }
    }
    // The two sides stay disconnected from each other.
    let left = sg.border_at(BorderKind::Left, 0).unwrap();
    let right = sg.border_at(BorderKind::Right, 0).unwrap();
    assert!(!g.has_edge(left, right, None));
    assert!(!g.has_edge(right, left, None));
}

#[test]
fn handles_nested_clusters_independently() {
    let mut g = new_graph();
    cluster(&mut g, "outer", 0, 2);
    cluster(&mut g, "inner", 1, 1);
    g.set_parent("inner", Some("outer")).unwrap();
    g.set_parent("a", Some("inner")).unwrap();
    let mut ids = IdMinter::new();

    add_border_segments(&mut g, &mut ids).unwrap();
    let outer = g.node("outer").unwrap().clone();
    let inner = g.node("inner").unwrap().clone();
    assert!(outer.border_at(BorderKind::Left, 0).is_some());
    assert!(outer.border_at(BorderKind::Left, 2).is_some());
    assert!(inner.border_at(BorderKind::Left, 1).is_some());
    assert!(inner.border_at(BorderKind::Left, 0).is_none());
    let inner_left = inner.border_at(BorderKind::Left, 1).unwrap();
    assert_eq!(g.parent(inner_left), Some("inner"));
}
