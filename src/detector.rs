//! Submodule providing `SuperbubbleDetector`: orchestrates partitioning,
//! per-component DAG construction, linear-time detection, and filtering
//! into the final list of superbubbles.
use crate::dag::Dag;
use crate::graph::Graph;
use crate::ids::GlobalId;
use crate::subgraph::Subgraph;

/// A confirmed superbubble, as a pair of global vertex ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superbubble {
    /// The single entrance of the superbubble.
    pub entrance: usize,
    /// The single exit of the superbubble.
    pub exit: usize,
}

/// Recovers the real external exit a collapsed `(entrance, r')` result
/// stands for, or `None` if it doesn't stand for a single consistent one.
///
/// `r'` merges every cross-SCC exit (and, for bucket 0, every genuine dead
/// end) into one vertex, so a confirmed `(s, r')` result only reflects a
/// real superbubble when every local vertex feeding `r'` from within the
/// validated range — i.e. at a topological position between `s` and `r'` —
/// agrees on the same external target. `to_local` maps a DAG-level parent of
/// `r'` back to the local real-vertex index used by `targets`, returning
/// `None` for a parent that cannot stand for a genuine cross-SCC exit (e.g.
/// a primed vertex introduced by `GraphToDAG`'s no-`r'` fallback).
fn recover_exit_through_terminal(
    dag: &Dag,
    terminal_dag_id: usize,
    entrance_dag_id: usize,
    targets: &[Option<GlobalId>],
    to_local: impl Fn(usize) -> Option<usize>,
) -> Option<GlobalId> {
    let entrance_pos = dag.position(entrance_dag_id)?;
    let terminal_pos = dag.position(terminal_dag_id)?;
    let mut recovered: Option<GlobalId> = None;
    for &parent in dag.parents(terminal_dag_id)? {
        let pos = dag.position(parent)?;
        if pos < entrance_pos || pos >= terminal_pos {
            continue;
        }
        let local = to_local(parent)?;
        let target = targets.get(local).copied().flatten()?;
        match recovered {
            None => recovered = Some(target),
            Some(existing) if existing == target => {}
            Some(_) => return None,
        }
    }
    recovered
}

/// Partitions `graph` into per-SCC subgraphs, runs the acyclic transform
/// and linear-time detector on each, filters out duplication artifacts,
/// and returns every confirmed superbubble in terms of the original
/// graph's vertex ids.
#[must_use]
pub fn find(graph: &Graph) -> Vec<Superbubble> {
    let num_vertices = graph.num_vertices();
    let (scc, num_subgraphs) = graph.fill_scc();

    let mut local_id = vec![0usize; num_vertices];
    let mut subgraph_size = vec![0usize; num_subgraphs];
    for v in 0..num_vertices {
        local_id[v] = subgraph_size[scc[v]];
        subgraph_size[scc[v]] += 1;
    }

    let mut subgraphs: Vec<Subgraph> = subgraph_size.iter().map(|&size| Subgraph::new(size + 2)).collect();

    // For every local vertex whose edge into the artificial terminal `r'`
    // stands in for a real cross-SCC child (rather than a genuine dead end),
    // remembers which external global vertex it was. A collapsed bubble
    // exit (`t == r'`) is only a genuine superbubble if every local vertex
    // feeding that edge within the bubble's own range agrees on this target.
    let mut external_target: Vec<Vec<Option<GlobalId>>> =
        subgraph_size.iter().map(|&size| vec![None; size]).collect();

    for v in 0..num_vertices {
        let k = scc[v];
        let lv = local_id[v];
        let sg = &mut subgraphs[k];
        sg.set_global_id(lv, GlobalId::new(v)).expect("local id derived from this subgraph's own size");

        let children = graph.children(v).expect("vertex in range");
        if children.is_empty() {
            if k == 0 {
                sg.add_edge(lv, sg.terminal_id()).expect("local ids in range");
            }
        } else {
            let mut emitted_cross_scc_exit = false;
            for &u in children {
                if scc[u] == k {
                    sg.add_edge(lv, local_id[u]).expect("local ids in range");
                } else if !emitted_cross_scc_exit {
                    emitted_cross_scc_exit = true;
                    sg.add_edge(lv, sg.terminal_id()).expect("local ids in range");
                    external_target[k][lv] = Some(GlobalId::new(u));
                }
            }
        }

        let parents = graph.parents(v).expect("vertex in range");
        if parents.is_empty() {
            if k == 0 {
                sg.add_edge(sg.source_id(), lv).expect("local ids in range");
            }
        } else if parents.iter().any(|&u| scc[u] != k) {
            sg.add_edge(sg.source_id(), lv).expect("local ids in range");
        }
    }

    let mut result = Vec::new();

    // A direct edge u->v with no branching at either end is a degenerate
    // pass-through, not the "nontrivial subgraph" a superbubble entrance and
    // exit must bound; the candidate-generation rules in §4.4 admit it
    // regardless (they only look at a single neighbor's degree), so the
    // nontriviality requirement is enforced here instead, against the
    // original graph's own degrees.
    let is_nontrivial = |entrance: usize, exit: usize| {
        graph.out_degree(entrance).unwrap_or(0) >= 2 && graph.in_degree(exit).unwrap_or(0) >= 2
    };

    // Bucket 0 (the union of all singleton SCCs) is already acyclic: its
    // DAG is a direct copy, no GraphToDAG duplication needed.
    if !subgraphs.is_empty() {
        let sg0 = &subgraphs[0];
        let dag_size = sg0.num_vertices();
        let mut dag0 = Dag::new(dag_size);
        for v in 0..dag_size {
            for &u in sg0.children(v).unwrap_or(&[]) {
                dag0.push_edge(v, u);
            }
        }
        dag0.set_endpoints(sg0.source_id(), sg0.terminal_id());
        dag0.prepare_for_superbubbles();
        let outcome = dag0.detect();

        let last_possible_entrance = dag_size.saturating_sub(2);
        let dummy_terminal = sg0.terminal_id();
        for s in 0..last_possible_entrance {
            let Some(t) = outcome[s] else { continue };
            let exit = if t == dummy_terminal {
                recover_exit_through_terminal(&dag0, dummy_terminal, s, &external_target[0], Some)
                    .map(GlobalId::index)
            } else {
                Some(sg0.global_id(t).unwrap().index())
            };
            if let Some(exit) = exit {
                let entrance = sg0.global_id(s).unwrap().index();
                if is_nontrivial(entrance, exit) {
                    result.push(Superbubble { entrance, exit });
                }
            }
        }
    }

    // Every other bucket is a genuine non-singleton SCC: transform to a DAG
    // via vertex duplication, detect, then filter duplication artifacts.
    for (k, sg) in subgraphs.iter_mut().enumerate().skip(1) {
        let mut dag = sg.build_dag();
        dag.prepare_for_superbubbles();
        let outcome = dag.detect();

        let offset = sg.offset();
        let dummy_terminal = dag.num_vertices() - 1;
        for s in 0..offset {
            let Some(t) = outcome[s] else { continue };
            if t == dummy_terminal {
                let to_local = |p: usize| sg.is_duplicate_id(p).then(|| sg.original_id(p));
                if let Some(exit_id) =
                    recover_exit_through_terminal(&dag, dummy_terminal, s, &external_target[k], to_local)
                {
                    let entrance = sg.global_id(s).unwrap().index();
                    let exit = exit_id.index();
                    if is_nontrivial(entrance, exit) {
                        result.push(Superbubble { entrance, exit });
                    }
                }
                continue;
            }
            if sg.is_duplicate_id(t) {
                let real_t = sg.original_id(t);
                if sg.is_ancestor(real_t, s) {
                    let entrance = sg.global_id(s).unwrap().index();
                    let exit = sg.global_id(real_t).unwrap().index();
                    if is_nontrivial(entrance, exit) {
                        result.push(Superbubble { entrance, exit });
                    }
                }
            } else {
                let s2 = sg.duplicate_id(s);
                let t2 = sg.duplicate_id(t);
                if outcome[s2] == Some(t2) {
                    let entrance = sg.global_id(s).unwrap().index();
                    let exit = sg.global_id(t).unwrap().index();
                    if is_nontrivial(entrance, exit) {
                        result.push(Superbubble { entrance, exit });
                    }
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{find, Superbubble};
    use crate::graph::Graph;

    fn build(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        g
    }

    fn sorted(mut v: Vec<Superbubble>) -> Vec<Superbubble> {
        v.sort_by_key(|s| (s.entrance, s.exit));
        v
    }

    #[test]
    fn empty_graph_has_no_superbubbles() {
        let g = Graph::new(0);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn single_vertex_has_no_superbubbles() {
        let g = Graph::new(1);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn two_vertices_one_edge_has_no_superbubble() {
        let g = build(2, &[(0, 1)]);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn self_loop_has_no_superbubble() {
        let g = build(1, &[(0, 0)]);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn s1_classic_bubble() {
        let g = build(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let result = sorted(find(&g));
        assert_eq!(result, vec![Superbubble { entrance: 0, exit: 3 }]);
    }

    #[test]
    fn s2_chain_only() {
        let g = build(4, &[(0, 1), (1, 2), (2, 3)]);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn s3_nested_bubbles() {
        let g = build(7, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (3, 5), (4, 6), (5, 6)]);
        let result = sorted(find(&g));
        assert_eq!(result, vec![Superbubble { entrance: 0, exit: 3 }, Superbubble { entrance: 3, exit: 6 }]);
    }

    #[test]
    fn s4_cycle_requiring_graph_to_dag() {
        let g = build(4, &[(0, 1), (1, 2), (2, 1), (1, 3)]);
        assert!(find(&g).is_empty());
    }

    #[test]
    fn s5_two_disjoint_bubbles() {
        let g = build(8, &[(0, 1), (0, 2), (1, 3), (2, 3), (4, 5), (4, 6), (5, 7), (6, 7)]);
        let result = sorted(find(&g));
        assert_eq!(result, vec![Superbubble { entrance: 0, exit: 3 }, Superbubble { entrance: 4, exit: 7 }]);
    }

    #[test]
    fn s6_bubble_spanning_inter_scc_boundary() {
        let g = build(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 3)]);
        let result = sorted(find(&g));
        assert_eq!(result, vec![Superbubble { entrance: 0, exit: 3 }]);
    }

    #[test]
    fn running_twice_yields_identical_output() {
        let g = build(7, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (3, 5), (4, 6), (5, 6)]);
        assert_eq!(find(&g), find(&g));
    }

    #[test]
    fn every_reported_pair_has_distinct_valid_endpoints() {
        let g = build(8, &[(0, 1), (0, 2), (1, 3), (2, 3), (4, 5), (4, 6), (5, 7), (6, 7)]);
        for sb in find(&g) {
            assert_ne!(sb.entrance, sb.exit);
            assert!(sb.entrance < g.num_vertices());
            assert!(sb.exit < g.num_vertices());
        }
    }
}
