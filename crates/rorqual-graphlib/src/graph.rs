use indexmap::{Equivalent, IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::GraphError;

type OrderedMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type OrderedSet<T> = IndexSet<T, FxBuildHasher>;

/// Structural options, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    pub directed: bool,
    pub multigraph: bool,
    pub compound: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            directed: true,
            multigraph: false,
            compound: false,
        }
    }
}

/// Identity of an edge: ordered endpoints plus an optional name that
/// disambiguates parallel edges in a multigraph. For undirected graphs the
/// endpoints are stored in canonical (sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(v: impl Into<String>, w: impl Into<String>, name: Option<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name,
        }
    }
}

/// Borrowed view of an [`EdgeKey`], used for lookups without allocating.
/// Field order mirrors `EdgeKey` so the derived hashes agree.
#[derive(Hash)]
struct EdgeRef<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl Equivalent<EdgeKey> for EdgeRef<'_> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        self.v == key.v && self.w == key.w && self.name == key.name.as_deref()
    }
}

/// A mutable multigraph with optional compound hierarchy.
///
/// `N`, `E` and `G` are the node, edge and graph label types. Nodes are
/// identified by strings. Node and edge iteration order is insertion order.
pub struct Graph<N, E, G = ()> {
    options: GraphOptions,
    label: G,
    default_node: Option<Box<dyn Fn() -> N>>,
    default_edge: Option<Box<dyn Fn() -> E>>,
    nodes: OrderedMap<String, N>,
    edges: OrderedMap<EdgeKey, E>,
    ins: FxHashMap<String, OrderedSet<EdgeKey>>,
    outs: FxHashMap<String, OrderedSet<EdgeKey>>,
    // Multiplicity counts, not edge identities: parallel edges between the
    // same pair must collapse correctly when removed one at a time.
    preds: FxHashMap<String, OrderedMap<String, usize>>,
    sucs: FxHashMap<String, OrderedMap<String, usize>>,
    parents: FxHashMap<String, String>,
    kids: FxHashMap<String, OrderedSet<String>>,
    root_kids: OrderedSet<String>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
    E: Default,
{
    pub fn new(options: GraphOptions) -> Self
    where
        G: Default,
    {
        Self {
            options,
            label: G::default(),
            default_node: None,
            default_edge: None,
            nodes: OrderedMap::default(),
            edges: OrderedMap::default(),
            ins: FxHashMap::default(),
            outs: FxHashMap::default(),
            preds: FxHashMap::default(),
            sucs: FxHashMap::default(),
            parents: FxHashMap::default(),
            kids: FxHashMap::default(),
            root_kids: OrderedSet::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) {
        self.label = label;
    }

    pub fn graph(&self) -> &G {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.label
    }

    pub fn set_default_node_label(&mut self, f: impl Fn() -> N + 'static) {
        self.default_node = Some(Box::new(f));
    }

    pub fn set_default_edge_label(&mut self, f: impl Fn() -> E + 'static) {
        self.default_edge = Some(Box::new(f));
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn has_node(&self, v: &str) -> bool {
        self.nodes.contains_key(v)
    }

    pub fn node(&self, v: &str) -> Option<&N> {
        self.nodes.get(v)
    }

    pub fn node_mut(&mut self, v: &str) -> Option<&mut N> {
        self.nodes.get_mut(v)
    }

    /// Upsert: replaces the label if the node exists, otherwise inserts the
    /// node and initializes its bookkeeping.
    pub fn set_node(&mut self, v: impl Into<String>, label: N) {
        let v = v.into();
        if let Some(slot) = self.nodes.get_mut(&v) {
            *slot = label;
            return;
        }
        self.init_node(v, label);
    }

    /// Inserts the node with the default label if it does not exist yet.
    pub fn ensure_node(&mut self, v: &str) {
        if !self.nodes.contains_key(v) {
            let label = self.make_default_node();
            self.init_node(v.to_string(), label);
        }
    }

    fn make_default_node(&self) -> N {
        match &self.default_node {
            Some(f) => f(),
            None => N::default(),
        }
    }

    fn make_default_edge(&self) -> E {
        match &self.default_edge {
            Some(f) => f(),
            None => E::default(),
        }
    }

    fn init_node(&mut self, v: String, label: N) {
        self.ins.insert(v.clone(), OrderedSet::default());
        self.outs.insert(v.clone(), OrderedSet::default());
        self.preds.insert(v.clone(), OrderedMap::default());
        self.sucs.insert(v.clone(), OrderedMap::default());
        if self.options.compound {
            self.root_kids.insert(v.clone());
        }
        self.nodes.insert(v, label);
    }

    /// Removes a node along with all incident edges. In a compound graph the
    /// node's children are reparented to its own parent.
    pub fn remove_node(&mut self, v: &str) -> bool {
        if !self.nodes.contains_key(v) {
            return false;
        }
        for e in self.node_edges(v) {
            self.remove_edge_key(&e);
        }
        if self.options.compound {
            let grandparent = self.parents.remove(v);
            match &grandparent {
                Some(p) => {
                    if let Some(set) = self.kids.get_mut(p) {
                        set.shift_remove(v);
                    }
                }
                None => {
                    self.root_kids.shift_remove(v);
                }
            }
            let children: Vec<String> = self
                .kids
                .remove(v)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();
            for child in children {
                match &grandparent {
                    Some(p) => {
                        self.parents.insert(child.clone(), p.clone());
                        self.kids.entry(p.clone()).or_default().insert(child);
                    }
                    None => {
                        self.parents.remove(&child);
                        self.root_kids.insert(child);
                    }
                }
            }
        }
        self.ins.remove(v);
        self.outs.remove(v);
        self.preds.remove(v);
        self.sucs.remove(v);
        self.nodes.shift_remove(v);
        true
    }

    /// Nodes with no incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|v| self.ins.get(v.as_str()).is_some_and(OrderedSet::is_empty))
            .cloned()
            .collect()
    }

    /// Nodes with no outgoing edges, in insertion order.
    pub fn sinks(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|v| self.outs.get(v.as_str()).is_some_and(OrderedSet::is_empty))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Assigns `v` a parent (or moves it to the root when `None`). Fails on
    /// non-compound graphs and rejects parent cycles before mutating anything.
    pub fn set_parent(&mut self, v: &str, parent: Option<&str>) -> Result<(), GraphError> {
        if !self.options.compound {
            return Err(GraphError::NotCompound);
        }
        if let Some(p) = parent {
            let mut ancestor = Some(p.to_string());
            while let Some(a) = ancestor {
                if a == v {
                    return Err(GraphError::ParentCycle {
                        child: v.to_string(),
                        parent: p.to_string(),
                    });
                }
                ancestor = self.parents.get(&a).cloned();
            }
            self.ensure_node(p);
        }
        self.ensure_node(v);
        match self.parents.remove(v) {
            Some(old) => {
                if let Some(set) = self.kids.get_mut(&old) {
                    set.shift_remove(v);
                }
            }
            None => {
                self.root_kids.shift_remove(v);
            }
        }
        match parent {
            Some(p) => {
                self.parents.insert(v.to_string(), p.to_string());
                self.kids
                    .entry(p.to_string())
                    .or_default()
                    .insert(v.to_string());
            }
            None => {
                self.root_kids.insert(v.to_string());
            }
        }
        Ok(())
    }

    pub fn parent(&self, v: &str) -> Option<&str> {
        if !self.options.compound {
            return None;
        }
        self.parents.get(v).map(String::as_str)
    }

    /// Children of `v`, in the order they were parented. Empty for leaves and
    /// for any node of a non-compound graph.
    pub fn children(&self, v: &str) -> Vec<String> {
        if !self.options.compound {
            return Vec::new();
        }
        self.kids
            .get(v)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Children of the implicit virtual root. For a non-compound graph this is
    /// every node.
    pub fn root_children(&self) -> Vec<String> {
        if self.options.compound {
            self.root_kids.iter().cloned().collect()
        } else {
            self.node_ids()
        }
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge keys in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.keys()
    }

    /// Cloned edge keys, for callers that mutate while iterating.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().cloned().collect()
    }

    fn canonical<'a>(&self, v: &'a str, w: &'a str) -> (&'a str, &'a str) {
        if !self.options.directed && v > w {
            (w, v)
        } else {
            (v, w)
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>, label: E) {
        self.set_edge_named(v, w, None, Some(label));
    }

    /// Upsert: if the identified edge exists only its label is replaced;
    /// otherwise missing endpoints are auto-created and the bookkeeping
    /// indices updated.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<String>,
        label: Option<E>,
    ) {
        let v = v.into();
        let w = w.into();
        let (cv, cw) = self.canonical(&v, &w);
        let (cv, cw) = (cv.to_string(), cw.to_string());
        let probe = EdgeRef {
            v: &cv,
            w: &cw,
            name: name.as_deref(),
        };
        if let Some(slot) = self.edges.get_mut(&probe) {
            if let Some(label) = label {
                *slot = label;
            }
            return;
        }
        let label = label.unwrap_or_else(|| self.make_default_edge());
        self.ensure_node(&cv);
        self.ensure_node(&cw);
        let key = EdgeKey::new(cv.clone(), cw.clone(), name);
        if let Some(set) = self.outs.get_mut(&cv) {
            set.insert(key.clone());
        }
        if let Some(set) = self.ins.get_mut(&cw) {
            set.insert(key.clone());
        }
        if let Some(map) = self.sucs.get_mut(&cv) {
            *map.entry(cw.clone()).or_insert(0) += 1;
        }
        if let Some(map) = self.preds.get_mut(&cw) {
            *map.entry(cv).or_insert(0) += 1;
        }
        self.edges.insert(key, label);
    }

    /// Inserts an unlabeled edge between each consecutive pair of nodes.
    pub fn set_path(&mut self, vs: &[&str]) {
        for pair in vs.windows(2) {
            self.set_edge_named(pair[0], pair[1], None, None);
        }
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let (v, w) = self.canonical(v, w);
        self.edges.get(&EdgeRef { v, w, name })
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let (v, w) = self.canonical(v, w);
        self.edges.get_mut(&EdgeRef { v, w, name })
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_by_key_mut(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let (v, w) = self.canonical(v, w);
        let probe = EdgeRef { v, w, name };
        let (key, label) = self.edges.shift_remove_entry(&probe)?;
        if let Some(set) = self.outs.get_mut(&key.v) {
            set.shift_remove(&key);
        }
        if let Some(set) = self.ins.get_mut(&key.w) {
            set.shift_remove(&key);
        }
        if let Some(map) = self.sucs.get_mut(&key.v) {
            if let Some(count) = map.get_mut(&key.w) {
                *count -= 1;
                if *count == 0 {
                    map.shift_remove(&key.w);
                }
            }
        }
        if let Some(map) = self.preds.get_mut(&key.w) {
            if let Some(count) = map.get_mut(&key.v) {
                *count -= 1;
                if *count == 0 {
                    map.shift_remove(&key.v);
                }
            }
        }
        Some(label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Edges pointing into `v`, optionally restricted to those from `from`.
    pub fn in_edges(&self, v: &str, from: Option<&str>) -> Vec<EdgeKey> {
        let Some(set) = self.ins.get(v) else {
            return Vec::new();
        };
        set.iter()
            .filter(|e| from.is_none_or(|u| e.v == u))
            .cloned()
            .collect()
    }

    /// Edges leaving `v`, optionally restricted to those toward `to`.
    pub fn out_edges(&self, v: &str, to: Option<&str>) -> Vec<EdgeKey> {
        let Some(set) = self.outs.get(v) else {
            return Vec::new();
        };
        set.iter()
            .filter(|e| to.is_none_or(|u| e.w == u))
            .cloned()
            .collect()
    }

    /// All edges incident on `v`, in-edges first.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        let mut edges = self.in_edges(v, None);
        edges.extend(self.out_edges(v, None));
        edges
    }

    pub fn predecessors(&self, v: &str) -> Vec<String> {
        self.preds
            .get(v)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn successors(&self, v: &str) -> Vec<String> {
        self.sucs
            .get(v)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Predecessors followed by successors, deduplicated.
    pub fn neighbors(&self, v: &str) -> Vec<String> {
        let mut seen: OrderedSet<String> = OrderedSet::default();
        if let Some(map) = self.preds.get(v) {
            seen.extend(map.keys().cloned());
        }
        if let Some(map) = self.sucs.get(v) {
            seen.extend(map.keys().cloned());
        }
        seen.into_iter().collect()
    }
}
