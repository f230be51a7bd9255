//! Submodule providing the `GlobalId` newtype marking the local-to-global
//! vertex id conversion boundary between a [`crate::subgraph::Subgraph`] and
//! the original input graph.
use core::fmt;

/// A vertex id in the namespace of the original, undivided input graph.
///
/// Every other component in this crate (`Graph`, `Subgraph`, `Dag`) indexes
/// vertices with plain `usize` in its own local namespace. `GlobalId` exists
/// solely at the point where a `Subgraph` translates one of its local ids
/// back to the vertex id the caller of [`crate::find`] understands, so that
/// a bare `usize` cannot be mistaken for an already-translated id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalId(usize);

impl GlobalId {
    /// Wraps a raw vertex id as a global id.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying vertex id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GlobalId> for usize {
    fn from(id: GlobalId) -> Self {
        id.0
    }
}
