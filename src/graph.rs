//! Submodule providing the `Graph` struct: a directed multigraph with
//! adjacency and reverse-adjacency lists, degree counters, and Tarjan's
//! strongly-connected-components algorithm.
use bitvec::vec::BitVec;

use crate::error::GraphError;

/// A directed multigraph over vertex ids `[0, n)`.
///
/// Parallel edges and self-loops are retained rather than deduplicated,
/// mirroring the input format's "multiple edges between the same pair are
/// retained" rule. `Graph` is the shared base reused, unmodified, inside
/// [`crate::subgraph::Subgraph`] and [`crate::dag::Dag`]: it has no notion
/// of which of the three vertex-id namespaces (global, local, DAG) its
/// caller is working in — that bookkeeping lives one layer up.
#[derive(Debug, Clone)]
pub struct Graph {
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
    num_edges: usize,
}

impl Graph {
    /// Creates a new graph with `n` vertices and no edges.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            children: vec![Vec::new(); n],
            parents: vec![Vec::new(); n],
            in_degree: vec![0; n],
            out_degree: vec![0; n],
            num_edges: 0,
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.children.len()
    }

    /// Returns the number of edges added so far.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    fn check_vertex(&self, v: usize) -> Result<(), GraphError> {
        if v < self.num_vertices() {
            Ok(())
        } else {
            log::warn!(
                "vertex {v} is out of range for a graph of {} vertices",
                self.num_vertices()
            );
            Err(GraphError::VertexOutOfRange { id: v, num_vertices: self.num_vertices() })
        }
    }

    /// Returns the children of `v`, in insertion order.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn children(&self, v: usize) -> Result<&[usize], GraphError> {
        self.check_vertex(v)?;
        Ok(&self.children[v])
    }

    /// Returns the parents of `v`, in insertion order.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn parents(&self, v: usize) -> Result<&[usize], GraphError> {
        self.check_vertex(v)?;
        Ok(&self.parents[v])
    }

    /// Returns the in-degree of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn in_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.check_vertex(v)?;
        Ok(self.in_degree[v])
    }

    /// Returns the out-degree of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn out_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.check_vertex(v)?;
        Ok(self.out_degree[v])
    }

    /// Adds a directed edge `u -> v`.
    ///
    /// Out-of-range endpoints are logged and left as a no-op rather than
    /// panicking, matching this crate's argument-error handling: the graph
    /// never aborts on malformed-but-recoverable input.
    ///
    /// # Errors
    ///
    /// If `u` or `v` is not a valid vertex id.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        self.push_edge(u, v);
        Ok(())
    }

    /// Adds an edge without revalidating its endpoints.
    ///
    /// For use by callers (the partitioner, `GraphToDAG`) that have already
    /// derived `u` and `v` from this graph's own bounds.
    pub(crate) fn push_edge(&mut self, u: usize, v: usize) {
        self.children[u].push(v);
        self.parents[v].push(u);
        self.out_degree[u] += 1;
        self.in_degree[v] += 1;
        self.num_edges += 1;
    }

    /// Computes the strongly connected components of this graph using an
    /// iterative formulation of Tarjan's algorithm.
    ///
    /// Every singleton SCC (a single vertex with no self-loop) is labeled
    /// `0`. Every non-singleton SCC (including a single vertex with a
    /// self-loop) gets a distinct positive id assigned in discovery order.
    ///
    /// Returns `(scc, count)` where `scc[v]` is the id of `v`'s component
    /// and `count` is `1 + ` the number of non-singleton components — `1`
    /// is always included so that an empty (or all-singleton) graph still
    /// reports a (possibly empty) bucket `0`.
    #[must_use]
    pub fn fill_scc(&self) -> (Vec<usize>, usize) {
        let n = self.num_vertices();
        let mut disc = vec![0usize; n];
        let mut low = vec![0usize; n];
        let mut on_stack: BitVec = BitVec::repeat(false, n);
        let mut scc = vec![0usize; n];
        let mut tarjan_stack: Vec<usize> = Vec::new();
        let mut tick = 0usize;
        let mut current_scc = 1usize;

        struct Frame {
            v: usize,
            next_child: usize,
        }
        let mut call_stack: Vec<Frame> = Vec::new();

        for start in 0..n {
            if disc[start] != 0 {
                continue;
            }
            tick += 1;
            disc[start] = tick;
            low[start] = tick;
            tarjan_stack.push(start);
            on_stack.set(start, true);
            call_stack.push(Frame { v: start, next_child: 0 });

            while let Some(top) = call_stack.len().checked_sub(1) {
                let u = call_stack[top].v;
                let child_idx = call_stack[top].next_child;
                if child_idx < self.children[u].len() {
                    let v = self.children[u][child_idx];
                    call_stack[top].next_child += 1;
                    if disc[v] == 0 {
                        tick += 1;
                        disc[v] = tick;
                        low[v] = tick;
                        tarjan_stack.push(v);
                        on_stack.set(v, true);
                        call_stack.push(Frame { v, next_child: 0 });
                    } else if on_stack[v] {
                        low[u] = low[u].min(disc[v]);
                    }
                } else {
                    call_stack.pop();
                    if let Some(parent) = call_stack.last() {
                        let p = parent.v;
                        low[p] = low[p].min(low[u]);
                    }
                    if low[u] == disc[u] {
                        let mut size = 0usize;
                        loop {
                            let w = tarjan_stack.pop().expect("tarjan stack underflow");
                            on_stack.set(w, false);
                            scc[w] = current_scc;
                            size += 1;
                            if w == u {
                                break;
                            }
                        }
                        if size == 1 {
                            scc[u] = 0;
                        } else {
                            current_scc += 1;
                        }
                    }
                }
            }
        }

        (scc, current_scc)
    }
}

#[cfg(test)]
mod tests {
    use super::Graph;

    #[test]
    fn empty_graph_has_no_vertices_or_edges() {
        let g = Graph::new(0);
        assert_eq!(g.num_vertices(), 0);
        assert_eq!(g.num_edges(), 0);
        let (scc, count) = g.fill_scc();
        assert!(scc.is_empty());
        assert_eq!(count, 1);
    }

    #[test]
    fn add_edge_updates_degrees_and_adjacency() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.out_degree(0).unwrap(), 2);
        assert_eq!(g.in_degree(1).unwrap(), 1);
        assert_eq!(g.children(0).unwrap(), &[1, 2]);
        assert_eq!(g.parents(2).unwrap(), &[0]);
    }

    #[test]
    fn add_edge_rejects_out_of_range_endpoints() {
        let mut g = Graph::new(2);
        assert!(g.add_edge(0, 5).is_err());
        assert!(g.add_edge(5, 0).is_err());
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn parallel_edges_and_self_loops_are_retained() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 0).unwrap();
        assert_eq!(g.children(0).unwrap(), &[1, 1, 0]);
        assert_eq!(g.num_edges(), 3);
    }

    #[test]
    fn fill_scc_marks_singletons_as_zero() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        let (scc, count) = g.fill_scc();
        assert_eq!(scc, vec![0, 0, 0, 0]);
        assert_eq!(count, 1);
    }

    #[test]
    fn fill_scc_detects_a_cycle() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 1).unwrap();
        g.add_edge(1, 3).unwrap();
        let (scc, count) = g.fill_scc();
        assert_eq!(count, 2);
        assert_eq!(scc[0], 0);
        assert_eq!(scc[3], 0);
        assert_eq!(scc[1], scc[2]);
        assert_ne!(scc[1], 0);
    }

    #[test]
    fn fill_scc_treats_a_self_loop_as_non_singleton() {
        let mut g = Graph::new(1);
        g.add_edge(0, 0).unwrap();
        let (scc, count) = g.fill_scc();
        assert_eq!(count, 2);
        assert_ne!(scc[0], 0);
    }
}
