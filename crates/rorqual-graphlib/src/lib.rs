//! Compound multigraph used by the `rorqual` layout engine.
//!
//! The central type is [`Graph`], a mutable directed or undirected multigraph
//! with optional compound (cluster hierarchy) support. Iteration order over
//! nodes and edges is insertion order and is part of the contract: the layout
//! algorithms built on top are order-sensitive (spanning-tree root selection,
//! source enumeration) and tests pin this down.

pub mod alg;
mod error;
mod graph;

pub use error::GraphError;
pub use graph::{EdgeKey, Graph, GraphOptions};
