//! Submodule providing `Subgraph`: a [`Graph`] extended with the local↔global
//! id map, duplicate-id arithmetic, DFS ancestor timestamps, and the
//! `GraphToDAG` acyclic transform (Sung et al.).
use crate::dag::Dag;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::ids::GlobalId;

/// Three-color DFS vertex state, used only transiently while classifying
/// edges during [`Subgraph::build_dag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A graph restricted to one strongly connected component (or to the union
/// of all singleton components), augmented with an artificial source `r`
/// and sink `r'` and the bookkeeping `GraphToDAG` needs.
#[derive(Debug, Clone)]
pub struct Subgraph {
    graph: Graph,
    global_id: Vec<GlobalId>,
    discovery: Vec<usize>,
    finish: Vec<usize>,
    dfs_done: bool,
}

impl Subgraph {
    /// Creates a new subgraph with `n` local vertices (including the two
    /// reserved for `r` and `r'`) and an as-yet-unpopulated global id map.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            graph: Graph::new(n),
            global_id: vec![GlobalId::new(0); n],
            discovery: Vec::new(),
            finish: Vec::new(),
            dfs_done: false,
        }
    }

    /// Returns the number of local vertices, including `r` and `r'`.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    /// The number of "real" (non-`r`/`r'`) vertices; also the duplication
    /// offset used by the DAG-id namespace.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.num_vertices() - 2
    }

    /// Local id of the artificial source `r`.
    #[must_use]
    pub fn source_id(&self) -> usize {
        self.num_vertices() - 2
    }

    /// Local id of the artificial sink `r'`.
    #[must_use]
    pub fn terminal_id(&self) -> usize {
        self.num_vertices() - 1
    }

    /// Records the global id a local vertex corresponds to.
    ///
    /// # Errors
    ///
    /// If `local` is not a valid vertex id.
    pub fn set_global_id(&mut self, local: usize, global: GlobalId) -> Result<(), GraphError> {
        self.graph.children(local)?;
        self.global_id[local] = global;
        Ok(())
    }

    /// Returns the global id a local vertex corresponds to.
    ///
    /// # Errors
    ///
    /// If `local` is not a valid vertex id.
    pub fn global_id(&self, local: usize) -> Result<GlobalId, GraphError> {
        self.graph.children(local)?;
        Ok(self.global_id[local])
    }

    /// Adds a local edge `u -> v`.
    ///
    /// # Errors
    ///
    /// If `u` or `v` is not a valid vertex id.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.graph.add_edge(u, v)
    }

    /// Returns the children of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn children(&self, v: usize) -> Result<&[usize], GraphError> {
        self.graph.children(v)
    }

    /// Returns the parents of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn parents(&self, v: usize) -> Result<&[usize], GraphError> {
        self.graph.parents(v)
    }

    /// Returns the out-degree of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn out_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.graph.out_degree(v)
    }

    /// Returns the in-degree of `v`.
    ///
    /// # Errors
    ///
    /// If `v` is not a valid vertex id.
    pub fn in_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.graph.in_degree(v)
    }

    /// The DAG id of the primed copy of local vertex `v`.
    #[must_use]
    pub fn primed(v: usize) -> usize {
        v
    }

    /// The DAG id of the double-primed (duplicate) copy of local vertex `v`.
    #[must_use]
    pub fn duplicate_id(&self, v: usize) -> usize {
        v + self.offset()
    }

    /// Recovers the local vertex a duplicate DAG id stands for.
    ///
    /// Only meaningful when [`Self::is_duplicate_id`] holds for `t`.
    #[must_use]
    pub fn original_id(&self, t: usize) -> usize {
        t - self.offset()
    }

    /// Whether `t`, a DAG id within `[0, 2*offset)`, refers to the
    /// double-primed (duplicate) copy of a vertex rather than the primed
    /// (original) copy.
    #[must_use]
    pub fn is_duplicate_id(&self, t: usize) -> bool {
        t >= self.offset()
    }

    /// Whether `ancestor` is a strict DFS ancestor of `descendant` in this
    /// subgraph, using the discovery/finish timestamps recorded by the most
    /// recent [`Self::build_dag`] call.
    ///
    /// Returns `false` and logs if called before `build_dag`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, descendant: usize) -> bool {
        if !self.dfs_done {
            log::warn!("is_ancestor called before build_dag; returning false");
            return false;
        }
        self.discovery[ancestor] < self.discovery[descendant] && self.finish[descendant] < self.finish[ancestor]
    }

    /// Runs the `GraphToDAG` transform (Sung et al.), producing a
    /// single-source single-sink acyclic graph from this (possibly cyclic)
    /// subgraph.
    ///
    /// Also populates the DFS discovery/finish timestamps consumed by
    /// [`Self::is_ancestor`].
    #[must_use]
    pub fn build_dag(&mut self) -> Dag {
        let offset = self.offset();
        let r = self.source_id();
        let r_prime = self.terminal_id();
        let new_source = 2 * offset;
        let new_sink = 2 * offset + 1;
        let mut dag = Dag::new(2 * offset + 2);

        for &v in self.graph.children(r).unwrap_or(&[]) {
            if v != r_prime {
                dag.push_edge(new_source, v);
            }
        }
        for &v in self.graph.parents(r_prime).unwrap_or(&[]) {
            if v != r {
                dag.push_edge(self.duplicate_id(v), new_sink);
            }
        }

        let root = if self.graph.out_degree(r).unwrap_or(0) > 0 { r } else { 0 };
        self.run_dfs_and_classify(&mut dag, root, r, r_prime);

        if self.graph.out_degree(r).unwrap_or(0) == 0 {
            for u in 0..dag.num_vertices() {
                if u == new_source || u == new_sink {
                    continue;
                }
                if dag.in_degree(u).unwrap_or(0) == 0 {
                    dag.push_edge(new_source, u);
                }
            }
        }
        if self.graph.in_degree(r_prime).unwrap_or(0) == 0 {
            for u in 0..dag.num_vertices() {
                if u == new_source || u == new_sink {
                    continue;
                }
                if dag.out_degree(u).unwrap_or(0) == 0 {
                    dag.push_edge(u, new_sink);
                }
            }
        }

        dag.set_endpoints(new_source, new_sink);
        dag
    }

    /// Iterative three-color DFS over real vertices (skipping `r`/`r'`),
    /// emitting DAG edges per §4.3's tree/back/forward-cross rules and
    /// recording discovery/finish timestamps for [`Self::is_ancestor`].
    fn run_dfs_and_classify(&mut self, dag: &mut Dag, root: usize, r: usize, r_prime: usize) {
        let n = self.num_vertices();
        let mut color = vec![Color::White; n];
        let mut discovery = vec![0usize; n];
        let mut finish = vec![0usize; n];
        let mut tick = 0usize;

        struct Frame {
            v: usize,
            next_child: usize,
        }
        let mut stack: Vec<Frame> = Vec::new();

        // `root == r` means r has out-edges; r itself is never colored or
        // pushed (r/r' are excluded from this DFS), so the tree(s) rooted
        // "at r" are really the trees rooted at each of r's children, visited
        // in r's own adjacency order, before falling back to any real
        // vertex r doesn't reach.
        let starts: Vec<usize> = if root == r {
            self.graph.children(r).unwrap_or(&[]).iter().copied().chain(0..n).collect()
        } else {
            core::iter::once(root).chain(0..n).collect()
        };
        for start in starts {
            if start == r || start == r_prime || color[start] != Color::White {
                continue;
            }
            color[start] = Color::Gray;
            tick += 1;
            discovery[start] = tick;
            stack.push(Frame { v: start, next_child: 0 });

            while let Some(top) = stack.len().checked_sub(1) {
                let u = stack[top].v;
                let child_idx = stack[top].next_child;
                let children = self.graph.children(u).unwrap_or(&[]);
                if child_idx < children.len() {
                    let v = children[child_idx];
                    stack[top].next_child += 1;
                    if u == r || u == r_prime || v == r || v == r_prime {
                        continue;
                    }
                    match color[v] {
                        Color::White => {
                            dag.push_edge(Self::primed(u), Self::primed(v));
                            dag.push_edge(self.duplicate_id(u), self.duplicate_id(v));
                            color[v] = Color::Gray;
                            tick += 1;
                            discovery[v] = tick;
                            stack.push(Frame { v, next_child: 0 });
                        }
                        Color::Gray => {
                            dag.push_edge(Self::primed(u), self.duplicate_id(v));
                        }
                        Color::Black => {
                            dag.push_edge(Self::primed(u), Self::primed(v));
                            dag.push_edge(self.duplicate_id(u), self.duplicate_id(v));
                        }
                    }
                } else {
                    stack.pop();
                    color[u] = Color::Black;
                    tick += 1;
                    finish[u] = tick;
                }
            }
        }

        self.discovery = discovery;
        self.finish = finish;
        self.dfs_done = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_bubble_subgraph() -> Subgraph {
        // r=4, r'=5; real vertices 0..4 forming the classic bubble.
        let mut sg = Subgraph::new(6);
        sg.add_edge(sg.source_id(), 0).unwrap();
        sg.add_edge(0, 1).unwrap();
        sg.add_edge(0, 2).unwrap();
        sg.add_edge(1, 3).unwrap();
        sg.add_edge(2, 3).unwrap();
        sg.add_edge(3, sg.terminal_id()).unwrap();
        sg
    }

    #[test]
    fn offset_and_endpoint_ids_follow_vertex_count() {
        let sg = Subgraph::new(6);
        assert_eq!(sg.offset(), 4);
        assert_eq!(sg.source_id(), 4);
        assert_eq!(sg.terminal_id(), 5);
    }

    #[test]
    fn duplicate_id_round_trips() {
        let sg = Subgraph::new(6);
        assert_eq!(sg.duplicate_id(2), 6);
        assert!(sg.is_duplicate_id(6));
        assert!(!sg.is_duplicate_id(2));
        assert_eq!(sg.original_id(6), 2);
    }

    #[test]
    fn build_dag_produces_expected_vertex_count() {
        let mut sg = build_bubble_subgraph();
        let dag = sg.build_dag();
        // offset = 4, so 2*4+2 = 10 DAG vertices.
        assert_eq!(dag.num_vertices(), 10);
    }

    #[test]
    fn is_ancestor_false_before_build_dag() {
        let sg = build_bubble_subgraph();
        assert!(!sg.is_ancestor(0, 1));
    }

    #[test]
    fn is_ancestor_true_after_build_dag_for_tree_path() {
        let mut sg = build_bubble_subgraph();
        let _dag = sg.build_dag();
        assert!(sg.is_ancestor(0, 1));
        assert!(sg.is_ancestor(0, 3));
        assert!(!sg.is_ancestor(1, 2));
    }

    fn build_root_seeded_cycle_subgraph() -> Subgraph {
        // r=3, r'=4; real vertices 0,1,2 form a cycle 0->1->2->0. r's only
        // real out-edge goes to 2, so the DFS tree must start at 2 (r's
        // child), not at vertex 0.
        let mut sg = Subgraph::new(5);
        sg.add_edge(sg.source_id(), 2).unwrap();
        sg.add_edge(0, 1).unwrap();
        sg.add_edge(1, 2).unwrap();
        sg.add_edge(2, 0).unwrap();
        sg.add_edge(1, sg.terminal_id()).unwrap();
        sg
    }

    #[test]
    fn build_dag_starts_the_dfs_from_rs_children_not_vertex_zero() {
        let mut sg = build_root_seeded_cycle_subgraph();
        let _dag = sg.build_dag();
        assert!(sg.is_ancestor(2, 0));
        assert!(sg.is_ancestor(0, 1));
        assert!(!sg.is_ancestor(1, 2));
    }
}
