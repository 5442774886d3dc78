//! Label types attached to the layout graph.
//!
//! The pipeline grows these labels stage by stage: ranks appear after the
//! ranker, orders after crossing minimization, coordinates after positioning.
//! Fields that only exist for a synthetic node carry the [`DummyKind`] tag so
//! each stage can tell, at the type level, what it is looking at.

use serde::{Deserialize, Serialize};

use rorqual_graphlib::EdgeKey;

/// Direction of rank growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    /// Top to bottom.
    #[default]
    TB,
    /// Bottom to top.
    BT,
    /// Left to right.
    LR,
    /// Right to left.
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, RankDir::BT | RankDir::RL)
    }
}

/// Placement of an edge label relative to the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

/// Ranking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

/// Cycle-breaking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Acyclicer {
    /// Reverse the back edges of a depth-first spanning forest.
    #[default]
    DepthFirst,
    /// Eades-Lin-Smyth greedy feedback arc set.
    Greedy,
}

/// Forced horizontal alignment for coordinate assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

/// What a synthetic node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DummyKind {
    /// Segment of a multi-rank edge chain.
    Edge,
    /// Chain segment that carries the edge's label box.
    EdgeLabel,
    /// Temporary placeholder keeping space for a label while empty ranks are
    /// removed.
    EdgeProxy,
    /// Cluster boundary marker.
    Border,
    /// Placeholder reserving room for a self-loop.
    SelfLoop,
    /// Synthetic root tying the nesting graph together.
    Root,
}

/// Which side of a cluster a border node marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderKind {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A self-loop lifted off the graph before layout and restored at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfLoop {
    pub key: EdgeKey,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    /// Overall drawing size, written by the final translation.
    pub width: f64,
    pub height: f64,

    // Pipeline-internal state.
    pub nesting_root: Option<String>,
    pub node_rank_factor: Option<i32>,
    pub dummy_chains: Vec<String>,
    pub max_rank: Option<i32>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            acyclicer: Acyclicer::DepthFirst,
            ranker: Ranker::NetworkSimplex,
            width: 0.0,
            height: 0.0,
            nesting_root: None,
            node_rank_factor: None,
            dummy_chains: Vec::new(),
            max_rank: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: Option<DummyKind>,

    /// Label placement, only meaningful on [`DummyKind::EdgeLabel`] dummies.
    pub labelpos: Option<LabelPos>,
    /// Original edge label carried by the first dummy of a chain.
    pub edge_label: Option<EdgeLabel>,
    /// Original edge identity carried by chain and proxy dummies.
    pub edge_obj: Option<EdgeKey>,

    /// Rank span of a cluster, from its border top/bottom nodes.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    /// Left/right border node per rank, indexed by rank.
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,
    /// Set on border dummies themselves.
    pub border_kind: Option<BorderKind>,

    /// Self-loops recorded on their endpoint while the graph is laid out.
    pub self_loops: Vec<SelfLoop>,
    /// The loop a [`DummyKind::SelfLoop`] placeholder stands for.
    pub self_loop: Option<SelfLoop>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn border_at(&self, kind: BorderKind, rank: usize) -> Option<&str> {
        let list = match kind {
            BorderKind::Left => &self.border_left,
            BorderKind::Right => &self.border_right,
        };
        list.get(rank).and_then(|slot| slot.as_deref())
    }

    pub fn set_border_at(&mut self, kind: BorderKind, rank: usize, id: String) {
        let list = match kind {
            BorderKind::Left => &mut self.border_left,
            BorderKind::Right => &mut self.border_right,
        };
        if list.len() <= rank {
            list.resize(rank + 1, None);
        }
        list[rank] = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Minimum number of ranks this edge must span.
    pub minlen: i32,
    pub weight: f64,
    /// Label box size.
    pub width: f64,
    pub height: f64,
    pub labeloffset: f64,
    pub labelpos: LabelPos,

    /// Route vertices, including both boundary intersection endpoints.
    pub points: Vec<Point>,
    /// Label center, present when the edge has a label box.
    pub x: Option<f64>,
    pub y: Option<f64>,

    // Pipeline-internal state.
    pub label_rank: Option<i32>,
    pub reversed: bool,
    pub forward_name: Option<String>,
    pub nesting_edge: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            labeloffset: 10.0,
            labelpos: LabelPos::R,
            points: Vec::new(),
            x: None,
            y: None,
            label_rank: None,
            reversed: false,
            forward_name: None,
            nesting_edge: false,
        }
    }
}

impl EdgeLabel {
    /// A plain connecting edge with the given weight and no label box.
    pub fn weighted(weight: f64, minlen: i32) -> Self {
        Self {
            weight,
            minlen,
            width: 0.0,
            height: 0.0,
            labeloffset: 0.0,
            ..Default::default()
        }
    }
}
