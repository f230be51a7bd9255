//! Integration tests exercising the quantified invariants from the
//! superbubble detector's testable-properties list against randomly
//! generated graphs.
use std::collections::HashSet;

use proptest::prelude::*;
use superbubble_core::{find, Graph};

fn build_graph(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::new(n);
    for &(u, v) in edges {
        g.add_edge(u, v).unwrap();
    }
    g
}

fn arbitrary_graph(max_n: usize, max_edges: usize) -> impl Strategy<Value = Graph> {
    (1..=max_n).prop_flat_map(move |n| {
        prop::collection::vec((0..n, 0..n), 0..=max_edges).prop_map(move |edges| build_graph(n, &edges))
    })
}

proptest! {
    #[test]
    fn reported_pairs_are_distinct_and_in_range(g in arbitrary_graph(12, 24)) {
        for sb in find(&g) {
            prop_assert_ne!(sb.entrance, sb.exit);
            prop_assert!(sb.entrance < g.num_vertices());
            prop_assert!(sb.exit < g.num_vertices());
        }
    }

    #[test]
    fn result_is_a_partial_function(g in arbitrary_graph(12, 24)) {
        let mut seen_entrances = HashSet::new();
        for sb in find(&g) {
            prop_assert!(seen_entrances.insert(sb.entrance), "entrance {} reported twice", sb.entrance);
        }
    }

    #[test]
    fn detector_is_idempotent(g in arbitrary_graph(10, 20)) {
        let first = find(&g);
        let second = find(&g);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_graph_yields_empty_result() {
    let g = Graph::new(0);
    assert!(find(&g).is_empty());
}

#[test]
fn known_superbubble_round_trips_through_the_full_pipeline() {
    let g = build_graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let result = find(&g);
    assert_eq!(result.iter().filter(|sb| sb.entrance == 0 && sb.exit == 3).count(), 1);
}
