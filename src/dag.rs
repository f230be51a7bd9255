//! Submodule providing `Dag`: a single-source, single-sink acyclic
//! [`Graph`](crate::graph::Graph) with a topological order, candidate list,
//! `outParent`/`outChild` arrays, and the linear-time superbubble detector
//! of Brankovic et al.
use crate::candidate::{CandidateHandle, CandidateList};
use crate::graph::Graph;
use crate::rmq::SparseTable;

/// A single-source, single-sink directed acyclic graph prepared for
/// superbubble detection.
#[derive(Debug)]
pub struct Dag {
    graph: Graph,
    source: usize,
    sink: usize,
    ord: Vec<usize>,
    inv_ord: Vec<usize>,
    candidates: CandidateList,
    previous_entrance: Vec<Option<CandidateHandle>>,
    out_parent: Vec<i64>,
    out_child: Vec<i64>,
    min_out_parent: Option<SparseTable>,
    max_out_child: Option<SparseTable>,
    prepared: bool,
}

impl Dag {
    /// Creates a new DAG with `n` vertices and no edges. The source and
    /// sink default to `0`; call [`Self::set_endpoints`] once they are
    /// known.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            graph: Graph::new(n),
            source: 0,
            sink: 0,
            ord: Vec::new(),
            inv_ord: Vec::new(),
            candidates: CandidateList::new(),
            previous_entrance: Vec::new(),
            out_parent: Vec::new(),
            out_child: Vec::new(),
            min_out_parent: None,
            max_out_child: None,
            prepared: false,
        }
    }

    /// Records the designated single source and single sink.
    pub fn set_endpoints(&mut self, source: usize, sink: usize) {
        self.source = source;
        self.sink = sink;
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    /// Returns the in-degree of `v`, or `0` if `v` is out of range.
    #[must_use]
    pub fn in_degree(&self, v: usize) -> Option<usize> {
        self.graph.in_degree(v).ok()
    }

    /// Returns the out-degree of `v`, or `0` if `v` is out of range.
    #[must_use]
    pub fn out_degree(&self, v: usize) -> Option<usize> {
        self.graph.out_degree(v).ok()
    }

    /// Returns the parents of `v`, or `None` if `v` is out of range.
    #[must_use]
    pub fn parents(&self, v: usize) -> Option<&[usize]> {
        self.graph.parents(v).ok()
    }

    /// Returns the topological position of `v`, or `None` if `v` is out of
    /// range or the DAG has not been prepared yet.
    #[must_use]
    pub fn position(&self, v: usize) -> Option<usize> {
        self.ord.get(v).copied()
    }

    /// Adds an edge without bounds revalidation; used internally while the
    /// DAG is being constructed by `GraphToDAG`.
    pub(crate) fn push_edge(&mut self, u: usize, v: usize) {
        self.graph.push_edge(u, v);
    }

    /// Runs the preparation phase: topological order, candidate list,
    /// `outParent`/`outChild` arrays, and the two RMQ indices.
    pub fn prepare_for_superbubbles(&mut self) {
        self.compute_topological_order();
        self.build_candidate_list();
        self.build_out_parent_child();
        self.prepared = true;
    }

    fn compute_topological_order(&mut self) {
        let n = self.num_vertices();
        let mut visited = vec![false; n];
        let mut post_order: Vec<usize> = Vec::with_capacity(n);

        struct Frame {
            v: usize,
            next_child: usize,
        }
        let mut stack: Vec<Frame> = Vec::new();

        if n > 0 {
            visited[self.source] = true;
            stack.push(Frame { v: self.source, next_child: 0 });

            while let Some(top) = stack.len().checked_sub(1) {
                let u = stack[top].v;
                let child_idx = stack[top].next_child;
                let children = self.graph.children(u).unwrap_or(&[]);
                if child_idx < children.len() {
                    let v = children[child_idx];
                    stack[top].next_child += 1;
                    if !visited[v] {
                        visited[v] = true;
                        stack.push(Frame { v, next_child: 0 });
                    }
                } else {
                    stack.pop();
                    post_order.push(u);
                }
            }
        }

        let inv_ord: Vec<usize> = post_order.into_iter().rev().collect();
        let mut ord = vec![0usize; n];
        for (pos, &v) in inv_ord.iter().enumerate() {
            ord[v] = pos;
        }
        self.ord = ord;
        self.inv_ord = inv_ord;
    }

    fn build_candidate_list(&mut self) {
        let n = self.num_vertices();
        self.previous_entrance = vec![None; n];
        let mut current_prev_entrance: Option<CandidateHandle> = None;

        for pos in 0..self.inv_ord.len().min(n) {
            let v = self.inv_ord[pos];
            let is_exit_eligible = self
                .graph
                .parents(v)
                .unwrap_or(&[])
                .iter()
                .any(|&p| self.graph.out_degree(p).unwrap_or(0) == 1);
            if is_exit_eligible {
                self.candidates.insert(v, false, current_prev_entrance);
            }

            let is_entrance_eligible = self
                .graph
                .children(v)
                .unwrap_or(&[])
                .iter()
                .any(|&c| self.graph.in_degree(c).unwrap_or(0) == 1);
            if is_entrance_eligible {
                let handle = self.candidates.insert(v, true, None);
                current_prev_entrance = Some(handle);
            }

            self.previous_entrance[v] = current_prev_entrance;
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn build_out_parent_child(&mut self) {
        let n = self.num_vertices();
        let mut out_parent = vec![n as i64; n];
        let mut out_child = vec![-1i64; n];

        for v in 0..n {
            let pos = self.ord[v];
            let min_parent_pos = self
                .graph
                .parents(v)
                .unwrap_or(&[])
                .iter()
                .map(|&p| self.ord[p])
                .min();
            out_parent[pos] = min_parent_pos.map_or(n as i64, |p| p as i64);

            let max_child_pos = self
                .graph
                .children(v)
                .unwrap_or(&[])
                .iter()
                .map(|&c| self.ord[c])
                .max();
            out_child[pos] = max_child_pos.map_or(-1, |p| p as i64);
        }

        self.min_out_parent = Some(SparseTable::build(out_parent.clone(), false));
        self.max_out_child = Some(SparseTable::build(out_child.clone(), true));
        self.out_parent = out_parent;
        self.out_child = out_child;
    }

    /// Checks whether the span from `start_cand` to `exit_cand` forms a
    /// valid superbubble, per §4.4's `validate`.
    ///
    /// Returns `Ok(Some(start_cand))` if the span is self-contained,
    /// `Ok(Some(tighter))` if a narrower entrance candidate should be tried
    /// next, or `Ok(None)` if `exit_cand` cannot be validated at all.
    #[allow(clippy::cast_possible_wrap)]
    fn validate(&self, start_cand: CandidateHandle, exit_cand: CandidateHandle) -> Option<CandidateHandle> {
        let a = self.ord[self.candidates.vertex(start_cand)];
        let b = self.ord[self.candidates.vertex(exit_cand)];
        if a >= b {
            return None;
        }
        let out_child_max = self.max_out_child.as_ref()?.query_value(a, b - 1)?;
        if out_child_max != b as i64 {
            return None;
        }
        let out_parent_min_idx = self.min_out_parent.as_ref()?.query_index(a + 1, b)?;
        let out_parent_min = self.out_parent[out_parent_min_idx];
        if out_parent_min == a as i64 {
            return Some(start_cand);
        }
        let tighter_vertex = self.inv_ord[out_parent_min_idx];
        self.previous_entrance[tighter_vertex]
    }

    /// Runs the linear-time superbubble search over this prepared DAG,
    /// returning `result[s] = t` for every confirmed entrance vertex `s`.
    #[must_use]
    pub fn detect(&mut self) -> Vec<Option<usize>> {
        debug_assert!(self.prepared, "detect called before prepare_for_superbubbles");
        let n = self.num_vertices();
        let mut result: Vec<Option<usize>> = vec![None; n];
        let mut mark: Vec<Option<usize>> = vec![None; n];

        while !self.candidates.is_empty() {
            let tail = self.candidates.tail().expect("non-empty list has a tail");
            if self.candidates.is_entrance(tail) {
                self.candidates.pop_tail();
                continue;
            }
            let Some(start_cand) = self.candidates.front() else {
                self.candidates.pop_tail();
                continue;
            };
            self.report_super_bubble(start_cand, tail, &mut result, &mut mark);
        }

        result
    }

    /// Implements `reportSuperBubble(start, exit)` against the current tail
    /// of the candidate list, following §4.4 step by step including its
    /// nested recursive resolution of enclosed bubbles. `exit_cand` is
    /// always the current tail of the list.
    fn report_super_bubble(
        &mut self,
        start_cand: CandidateHandle,
        exit_cand: CandidateHandle,
        result: &mut [Option<usize>],
        mark: &mut [Option<usize>],
    ) {
        if self.ord[self.candidates.vertex(start_cand)] >= self.ord[self.candidates.vertex(exit_cand)] {
            self.candidates.pop_tail();
            return;
        }

        let Some(mut s) = self.candidates.prev_entrance(exit_cand) else {
            self.candidates.pop_tail();
            return;
        };

        let mut confirmed: Option<CandidateHandle> = None;
        while self.ord[self.candidates.vertex(s)] >= self.ord[self.candidates.vertex(start_cand)] {
            let Some(valid) = self.validate(s, exit_cand) else { break };
            if valid == s {
                confirmed = Some(s);
                break;
            }
            let valid_vertex = self.candidates.vertex(valid);
            let s_vertex = self.candidates.vertex(s);
            if mark[s_vertex] == Some(valid_vertex) {
                break;
            }
            mark[s_vertex] = Some(valid_vertex);
            s = valid;
        }

        let exit_vertex = self.candidates.vertex(exit_cand);
        self.candidates.pop_tail();

        if let Some(s) = confirmed {
            let s_vertex = self.candidates.vertex(s);
            result[s_vertex] = Some(exit_vertex);

            loop {
                let Some(tail) = self.candidates.tail() else { break };
                if tail == s {
                    break;
                }
                if self.candidates.is_entrance(tail) {
                    self.candidates.pop_tail();
                } else {
                    let Some(next_after_s) = self.candidates.next(s) else { break };
                    self.report_super_bubble(next_after_s, tail, result, mark);
                }
            }
        }
    }
}
