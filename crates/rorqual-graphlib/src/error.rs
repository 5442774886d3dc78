use thiserror::Error;

/// Errors raised by [`crate::Graph`] mutations and [`crate::alg`] traversals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A compound-only operation was invoked on a non-compound graph.
    #[error("cannot set parent in a non-compound graph")]
    NotCompound,

    /// Setting the requested parent would create a cycle in the hierarchy.
    #[error("setting `{parent}` as parent of `{child}` would create a cycle")]
    ParentCycle { child: String, parent: String },

    /// A traversal was started from a node that is not in the graph.
    #[error("graph does not have node `{0}`")]
    MissingNode(String),
}
