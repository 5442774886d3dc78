use rorqual::graphlib::{Graph, GraphOptions};
use rorqual::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, RankDir, layout};

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

fn sized_node(g: &mut LayoutGraph, v: &str) {
    g.set_node(v, NodeLabel::sized(40.0, 40.0));
}

fn center(g: &LayoutGraph, v: &str) -> (f64, f64) {
    let node = g.node(v).unwrap();
    (node.x.unwrap(), node.y.unwrap())
}

#[test]
fn a_single_node_lands_in_the_positive_quadrant() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel::sized(40.0, 20.0));
    layout(&mut g).unwrap();
    assert_eq!(center(&g, "a"), (20.0, 10.0));
    assert_eq!(g.graph().width, 40.0);
    assert_eq!(g.graph().height, 20.0);
}

#[test]
fn an_edge_spans_exactly_one_ranksep() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    layout(&mut g).unwrap();

    let (xa, ya) = center(&g, "a");
    let (xb, yb) = center(&g, "b");
    assert_eq!(xa, xb);
    // Half of a, the default ranksep of 50, half of b.
    assert_eq!(yb - ya, 20.0 + 50.0 + 20.0);
}

#[test]
fn routes_touch_both_node_boundaries() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    layout(&mut g).unwrap();

    let (_, ya) = center(&g, "a");
    let (_, yb) = center(&g, "b");
    let points = &g.edge("a", "b", None).unwrap().points;
    assert!(points.len() >= 2);
    assert_eq!(points.first().unwrap().y, ya + 20.0);
    assert_eq!(points.last().unwrap().y, yb - 20.0);
}

#[test]
fn a_diamond_keeps_its_branches_side_by_side() {
    let mut g = new_graph();
    for v in ["a", "b", "c", "d"] {
        sized_node(&mut g, v);
    }
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_edge("a", "c", EdgeLabel::default());
    g.set_edge("b", "d", EdgeLabel::default());
    g.set_edge("c", "d", EdgeLabel::default());
    layout(&mut g).unwrap();

    let (xa, ya) = center(&g, "a");
    let (xb, yb) = center(&g, "b");
    let (xc, yc) = center(&g, "c");
    let (xd, yd) = center(&g, "d");
    assert_eq!(yb, yc);
    assert!(ya < yb && yb < yd);
    assert_ne!(xb, xc);
    // The joints sit between the branches.
    assert!(xa > xb.min(xc) && xa < xb.max(xc));
    assert!(xd > xb.min(xc) && xd < xb.max(xc));
}

#[test]
fn margins_pad_the_drawing_on_every_side() {
    let mut g = new_graph();
    g.set_graph(GraphLabel {
        marginx: 10.0,
        marginy: 20.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(40.0, 20.0));
    layout(&mut g).unwrap();
    assert_eq!(center(&g, "a"), (30.0, 30.0));
    assert_eq!(g.graph().width, 40.0 + 2.0 * 10.0);
    assert_eq!(g.graph().height, 20.0 + 2.0 * 20.0);
}

#[test]
fn rankdir_lr_grows_to_the_right() {
    let mut g = new_graph();
    g.set_graph(GraphLabel {
        rankdir: RankDir::LR,
        ..Default::default()
    });
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    layout(&mut g).unwrap();

    let (xa, ya) = center(&g, "a");
    let (xb, yb) = center(&g, "b");
    assert_eq!(ya, yb);
    assert_eq!(xb - xa, 20.0 + 50.0 + 20.0);
}

#[test]
fn rankdir_bt_grows_upward() {
    let mut g = new_graph();
    g.set_graph(GraphLabel {
        rankdir: RankDir::BT,
        ..Default::default()
    });
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    layout(&mut g).unwrap();
    assert!(center(&g, "b").1 < center(&g, "a").1);
}

#[test]
fn a_labeled_edge_gets_a_label_position() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge(
        "a",
        "b",
        EdgeLabel {
            width: 30.0,
            height: 16.0,
            ..Default::default()
        },
    );
    layout(&mut g).unwrap();

    let label = g.edge("a", "b", None).unwrap();
    let y = label.y.unwrap();
    let (_, ya) = center(&g, "a");
    let (_, yb) = center(&g, "b");
    assert!(label.x.is_some());
    assert!(ya < y && y < yb, "label at {y} is not between the nodes");
}

#[test]
fn a_self_loop_bulges_out_of_the_right_side() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    g.set_edge("a", "a", EdgeLabel::default());
    layout(&mut g).unwrap();

    let (xa, ya) = center(&g, "a");
    let label = g.edge("a", "a", None).unwrap();
    assert_eq!(label.points.len(), 5);
    for p in &label.points {
        assert!(p.x > xa, "route point {p:?} is not right of the node");
    }
    assert_eq!(label.points[2].y, ya);
}

#[test]
fn a_cluster_box_encloses_its_members() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_parent("a", Some("sg")).unwrap();
    g.set_parent("b", Some("sg")).unwrap();
    layout(&mut g).unwrap();

    let sg = g.node("sg").unwrap().clone();
    let (sx, sy) = (sg.x.unwrap(), sg.y.unwrap());
    for v in ["a", "b"] {
        let node = g.node(v).unwrap();
        let (x, y) = (node.x.unwrap(), node.y.unwrap());
        assert!(x - node.width / 2.0 >= sx - sg.width / 2.0);
        assert!(x + node.width / 2.0 <= sx + sg.width / 2.0);
        assert!(y - node.height / 2.0 >= sy - sg.height / 2.0);
        assert!(y + node.height / 2.0 <= sy + sg.height / 2.0);
    }
}

#[test]
fn a_cycle_lays_out_without_losing_edges() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_edge("b", "a", EdgeLabel::default());
    layout(&mut g).unwrap();

    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "a", None));
    for e in g.edge_keys() {
        assert!(!g.edge_by_key(&e).unwrap().points.is_empty());
    }
}

#[test]
fn does_not_restructure_the_input_graph() {
    let mut g = new_graph();
    sized_node(&mut g, "a");
    sized_node(&mut g, "b");
    g.set_edge("a", "b", EdgeLabel::default());
    layout(&mut g).unwrap();
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn the_same_input_always_yields_the_same_drawing() {
    let build = || {
        let mut g = new_graph();
        for v in ["a", "b", "c", "d", "e"] {
            sized_node(&mut g, v);
        }
        g.set_edge("a", "c", EdgeLabel::default());
        g.set_edge("b", "c", EdgeLabel::default());
        g.set_edge("c", "d", EdgeLabel::default());
        g.set_edge("c", "e", EdgeLabel::default());
        g.set_edge("a", "e", EdgeLabel::default());
        layout(&mut g).unwrap();
        let mut coords: Vec<(String, f64, f64)> = g
            .node_ids()
            .into_iter()
            .map(|v| {
                let n = g.node(&v).unwrap();
                (v.clone(), n.x.unwrap(), n.y.unwrap())
            })
            .collect();
        coords.sort_by(|a, b| a.0.cmp(&b.0));
        coords
    };
    assert_eq!(build(), build());
}
