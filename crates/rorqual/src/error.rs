use thiserror::Error;

/// Fatal layout failures. There is no recovery path: the layout call aborts
/// and the caller's graph is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] rorqual_graphlib::GraphError),

    /// A boundary intersection was requested for a ray starting at the
    /// rectangle's own center (zero-length direction vector).
    #[error("cannot intersect the boundary of `{node}` with a ray from its own center")]
    DegenerateIntersection { node: String },
}
