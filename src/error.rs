//! Submodule defining the error taxonomy for the superbubble detection core.
use thiserror::Error;

/// Errors that may occur when querying or mutating a [`crate::graph::Graph`],
/// a [`crate::subgraph::Subgraph`], or a [`crate::dag::Dag`].
///
/// All three share the same argument-error shape: every operation takes a
/// vertex id and the only way it can fail is that id being out of range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A vertex id was outside `[0, num_vertices)`.
    #[error("vertex {id} is out of range for a graph of {num_vertices} vertices")]
    VertexOutOfRange {
        /// The offending id.
        id: usize,
        /// The number of vertices in the graph that rejected it.
        num_vertices: usize,
    },
}
