use std::collections::VecDeque;

use common::types::{Distance, Edge, NodeId, SearchOutcome};
use path_solver_core::{GraphCsr, shortest_paths};
use proptest::prelude::*;
use proptest::strategy::Strategy;

/// Textbook Bellman-Ford over the stored edge list: n-1 full relaxation
/// rounds, then one more round whose any improvement proves a negative cycle
/// reachable from the source. Slow but obviously correct on small graphs.
fn bellman_ford_oracle(graph: &GraphCsr, source: NodeId) -> Option<Vec<Option<f64>>> {
    let n = graph.num_nodes;
    let edges: Vec<Edge> = (0..n)
        .flat_map(|u| graph.out_edges(u).map(move |(_, v, w)| (u, v, w)))
        .collect();

    let mut dist: Vec<Option<f64>> = vec![None; n];
    dist[source] = Some(0.0);

    for _ in 0..n.saturating_sub(1) {
        for &(u, v, w) in &edges {
            if let Some(du) = dist[u] {
                if dist[v].is_none_or(|dv| du + w < dv) {
                    dist[v] = Some(du + w);
                }
            }
        }
    }

    for &(u, v, w) in &edges {
        if let Some(du) = dist[u] {
            if dist[v].is_none_or(|dv| du + w < dv) {
                return None;
            }
        }
    }

    Some(dist)
}

/// Forward reachability from a set of seed nodes.
fn reachable_from(graph: &GraphCsr, seeds: &[NodeId]) -> Vec<bool> {
    let mut reached = vec![false; graph.num_nodes];
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for &s in seeds {
        if !reached[s] {
            reached[s] = true;
            queue.push_back(s);
        }
    }
    while let Some(u) = queue.pop_front() {
        for (_, v, _) in graph.out_edges(u) {
            if !reached[v] {
                reached[v] = true;
                queue.push_back(v);
            }
        }
    }
    reached
}

fn assert_journeys_consistent(
    graph: &GraphCsr,
    source: NodeId,
    distances: &[Distance],
    journeys: &[Vec<NodeId>],
) {
    for (v, journey) in journeys.iter().enumerate() {
        match distances[v] {
            Distance::Finite(d) => {
                assert_eq!(journey.first(), Some(&source), "journey for {v} starts at source");
                assert_eq!(journey.last(), Some(&v), "journey for {v} ends at {v}");
                let total: f64 = journey
                    .windows(2)
                    .map(|pair| {
                        graph
                            .edge_weight(pair[0], pair[1])
                            .unwrap_or_else(|| panic!("{} -> {} is not an edge", pair[0], pair[1]))
                    })
                    .sum();
                assert_eq!(total, d, "journey weight for {v} matches its distance");
            }
            Distance::Unreached | Distance::Undefined => {
                assert!(journey.is_empty(), "non-finite node {v} has no journey");
            }
        }
    }
}

/// Graphs with only non-negative integer weights: convergence is guaranteed
/// and the oracle is exact.
fn non_negative_graph_strategy() -> impl Strategy<Value = GraphCsr> {
    (2usize..8).prop_flat_map(|num_nodes| {
        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, 0i32..=8);
        prop::collection::vec(edge_generator, 0..16).prop_map(move |edges| {
            let edges: Vec<Edge> = edges
                .into_iter()
                .map(|(u, v, w)| (u, v, f64::from(w)))
                .collect();
            GraphCsr::from_edges(num_nodes, edges, 16).unwrap()
        })
    })
}

/// Random non-negative base graph with a strongly negative two-edge cycle
/// planted through the source, so divergence is certain.
fn planted_cycle_strategy() -> impl Strategy<Value = GraphCsr> {
    (2usize..8)
        .prop_flat_map(|num_nodes| {
            let edge_generator = (0usize..num_nodes, 0usize..num_nodes, 0i32..=8);
            (
                proptest::strategy::Just(num_nodes),
                prop::collection::vec(edge_generator, 0..12),
                1usize..num_nodes,
            )
        })
        .prop_map(|(num_nodes, base, partner)| {
            let mut edges: Vec<Edge> = base
                .into_iter()
                .map(|(u, v, w)| (u, v, f64::from(w)))
                .collect();
            edges.push((0, partner, -1000.0));
            edges.push((partner, 0, -1000.0));
            GraphCsr::from_edges(num_nodes, edges, 16).unwrap()
        })
}

proptest! {
    /// Property: without negative edges the engine converges and agrees with
    /// the brute-force oracle exactly, and every journey replays its distance.
    #[test]
    fn converging_graphs_match_oracle(graph in non_negative_graph_strategy()) {
        let expected = bellman_ford_oracle(&graph, 0)
            .expect("non-negative graphs cannot contain a negative cycle");

        match shortest_paths(&graph, 0).unwrap() {
            SearchOutcome::Paths { distances, journeys } => {
                for v in 0..graph.num_nodes {
                    match expected[v] {
                        Some(d) => prop_assert_eq!(distances[v], Distance::Finite(d)),
                        None => prop_assert_eq!(distances[v], Distance::Unreached),
                    }
                }
                assert_journeys_consistent(&graph, 0, &distances, &journeys);
            }
            SearchOutcome::NegativeCycle { cycle, .. } => {
                prop_assert!(false, "false cycle {:?} on a non-negative graph", cycle);
            }
        }
    }

    /// Property: a planted reachable negative cycle is always detected, the
    /// returned cycle is closed, edge-valid, and strictly negative, and the
    /// affected set is exactly forward reachability from the cycle.
    #[test]
    fn planted_cycles_are_detected(graph in planted_cycle_strategy()) {
        prop_assert!(
            bellman_ford_oracle(&graph, 0).is_none(),
            "fixture must contain a reachable negative cycle"
        );

        match shortest_paths(&graph, 0).unwrap() {
            SearchOutcome::NegativeCycle { cycle, distances } => {
                prop_assert!(cycle.len() >= 2);
                prop_assert_eq!(cycle.first(), cycle.last());

                let mut total = 0.0;
                for pair in cycle.windows(2) {
                    let w = graph.edge_weight(pair[0], pair[1]);
                    prop_assert!(w.is_some(), "{} -> {} is not an edge", pair[0], pair[1]);
                    total += w.unwrap_or(0.0);
                }
                prop_assert!(total < 0.0, "cycle weight {} is not negative", total);

                let affected = reachable_from(&graph, &cycle);
                for v in 0..graph.num_nodes {
                    if affected[v] {
                        prop_assert_eq!(distances[v], Distance::Undefined);
                    } else {
                        prop_assert_ne!(distances[v], Distance::Undefined);
                    }
                }
            }
            SearchOutcome::Paths { .. } => {
                prop_assert!(false, "reachable negative cycle was missed");
            }
        }
    }
}

#[test]
fn dag_distances_match_dijkstra_result() {
    // No negative weights, so Dijkstra is a valid oracle; values below were
    // computed by hand for this DAG.
    let edges: Vec<Edge> = vec![
        (0, 1, 2.0),
        (0, 3, 4.0),
        (1, 2, 1.0),
        (1, 5, 7.0),
        (2, 4, 5.0),
        (3, 4, 1.0),
        (4, 5, 1.0),
    ];
    let graph = GraphCsr::from_edges(6, edges, 8).unwrap();

    match shortest_paths(&graph, 0).unwrap() {
        SearchOutcome::Paths { distances, journeys } => {
            let expected = [0.0, 2.0, 3.0, 4.0, 5.0, 6.0];
            for (v, d) in expected.iter().enumerate() {
                assert_eq!(distances[v], Distance::Finite(*d));
            }
            assert_journeys_consistent(&graph, 0, &distances, &journeys);
            assert_eq!(journeys[5], vec![0, 3, 4, 5]);
        }
        SearchOutcome::NegativeCycle { cycle, .. } => {
            panic!("unexpected cycle {cycle:?} in a DAG")
        }
    }
}
