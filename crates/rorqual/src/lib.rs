//! Deterministic Sugiyama-style layered layout for directed, possibly
//! compound graphs.
//!
//! Build a [`Graph`] with [`NodeLabel`] sizes and [`EdgeLabel`] constraints,
//! configure a [`GraphLabel`], and call [`layout`]. On success every node has
//! center coordinates, every edge a routed point list, and the graph label the
//! drawing's bounding box.
//!
//! ```
//! use rorqual::{layout, EdgeLabel, GraphLabel, NodeLabel};
//! use rorqual_graphlib::{Graph, GraphOptions};
//!
//! let mut g: rorqual::LayoutGraph = Graph::new(GraphOptions {
//!     multigraph: true,
//!     compound: true,
//!     ..Default::default()
//! });
//! g.set_graph(GraphLabel::default());
//! g.set_node("a", NodeLabel::sized(40.0, 20.0));
//! g.set_node("b", NodeLabel::sized(40.0, 20.0));
//! g.set_edge("a", "b", EdgeLabel::default());
//! layout(&mut g).unwrap();
//! assert!(g.node("b").unwrap().y > g.node("a").unwrap().y);
//! ```

pub mod acyclic;
pub mod border;
pub mod coordinate_system;
mod error;
pub mod greedy_fas;
mod layout;
pub mod model;
pub mod nesting;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_loops;
pub mod util;

pub use error::LayoutError;
pub use layout::layout;
pub use model::{
    Acyclicer, Align, BorderKind, DummyKind, EdgeLabel, GraphLabel, LabelPos, NodeLabel, Point,
    RankDir, Ranker, SelfLoop,
};

/// The graph shape the pipeline operates on.
pub type LayoutGraph = rorqual_graphlib::Graph<NodeLabel, EdgeLabel, GraphLabel>;

/// Re-export of the underlying graph crate.
pub use rorqual_graphlib as graphlib;
