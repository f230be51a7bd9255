#![doc = include_str!("../README.md")]

pub mod candidate;
pub mod dag;
pub mod detector;
pub mod error;
pub mod graph;
pub mod ids;
pub mod rmq;
pub mod subgraph;

pub use detector::{find, Superbubble};
pub use error::GraphError;
pub use graph::Graph;

/// Re-exports the crate's public surface for glob-importing callers.
pub mod prelude {
    pub use crate::detector::{find, Superbubble};
    pub use crate::error::GraphError;
    pub use crate::graph::Graph;
    pub use crate::ids::GlobalId;
}
