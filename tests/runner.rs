use std::time::Duration;

use skeingraph::graph::GraphBuilder;
use skeingraph::node::FnNode;
use skeingraph::observer::END_NODE;
use skeingraph::registry::GraphId;
use skeingraph::runner::{GraphRunner, RunnerError};
use skeingraph::state::WorkflowState;

mod common;
use common::*;

fn linear_abc() -> skeingraph::graph::Graph {
    GraphBuilder::new()
        .add_node("A", TagNode { tag: "a" })
        .add_node("B", TagNode { tag: "b" })
        .add_node("C", TagNode { tag: "c" })
        .add_edge("A", "B")
        .add_edge("B", "C")
        .set_start("A")
        .build()
}

#[tokio::test]
async fn linear_chain_terminates_at_edge_map_dead_end() {
    let runner = GraphRunner::default();
    let (final_state, run_id) = runner
        .run_graph(&linear_abc(), WorkflowState::new("x"), None)
        .await
        .unwrap();

    assert!(!final_state.done);
    // Final state reflects the last node's output.
    assert_eq!(final_state.log.last().unwrap(), "ran:c");

    // One driver marker per node invocation, in execution order.
    let run_log = runner.run_store().log(&run_id).unwrap();
    assert_eq!(
        run_log,
        vec!["Running node: A", "Running node: B", "Running node: C"]
    );
}

#[tokio::test]
async fn state_log_interleaves_markers_with_node_lines() {
    let runner = GraphRunner::default();
    let (final_state, run_id) = runner
        .run_graph(&linear_abc(), WorkflowState::new("x"), None)
        .await
        .unwrap();

    // The state's own log carries both the driver markers and the lines the
    // nodes appended; the run store's log carries only the markers.
    assert_eq!(
        final_state.log,
        vec![
            "Running node: A",
            "ran:a",
            "Running node: B",
            "ran:b",
            "Running node: C",
            "ran:c",
        ]
    );
    assert_eq!(runner.run_store().log(&run_id).unwrap().len(), 3);
}

#[tokio::test]
async fn observer_sees_every_step_plus_end_sentinel() {
    let runner = GraphRunner::default();
    let observer = RecordingObserver::new();
    let (final_state, _run_id) = runner
        .run_graph(&linear_abc(), WorkflowState::new("x"), Some(&observer))
        .await
        .unwrap();

    let nodes = observer.nodes();
    assert_eq!(nodes, vec!["A", "B", "C", END_NODE]);

    let calls = observer.calls();
    // Step calls carry the pre-execution state: the marker for A is present
    // but A's own effect is not.
    let (_, first_state) = &calls[0];
    assert_eq!(first_state.log, vec!["Running node: A"]);
    // The terminal call carries the final state.
    let (_, end_state) = calls.last().unwrap();
    assert_eq!(end_state, &final_state);
}

#[tokio::test]
async fn done_flag_terminates_a_cycle_after_bounded_iterations() {
    // A -> A: endless by edges, bounded by the node flipping `done` on the
    // third visit.
    let graph = GraphBuilder::new()
        .add_node("A", CounterNode { limit: 3 })
        .add_edge("A", "A")
        .set_start("A")
        .build();

    let runner = GraphRunner::default();
    let observer = RecordingObserver::new();
    let (final_state, run_id) = runner
        .run_graph(&graph, WorkflowState::new("x"), Some(&observer))
        .await
        .unwrap();

    assert!(final_state.done);
    assert_eq!(final_state.chunks.len(), 3);

    let run_log = runner.run_store().log(&run_id).unwrap();
    assert_eq!(run_log.len(), 3);
    assert!(run_log.iter().all(|line| line == "Running node: A"));

    // Observer count is invocations + 1, even on `done` termination.
    assert_eq!(observer.nodes(), vec!["A", "A", "A", END_NODE]);
}

#[tokio::test]
async fn initially_done_state_runs_no_nodes() {
    let mut initial = WorkflowState::new("x");
    initial.done = true;

    let runner = GraphRunner::default();
    let observer = RecordingObserver::new();
    let (final_state, run_id) = runner
        .run_graph(&linear_abc(), initial, Some(&observer))
        .await
        .unwrap();

    assert!(final_state.log.is_empty());
    assert!(runner.run_store().log(&run_id).unwrap().is_empty());
    // Only the terminal sentinel call fires.
    assert_eq!(observer.nodes(), vec![END_NODE]);
}

#[tokio::test]
async fn dangling_edge_fails_without_corrupting_the_store() {
    // A routes to Z, which was never registered: A runs, then the walk
    // fails resolving Z.
    let graph = GraphBuilder::new()
        .add_node("A", TagNode { tag: "a" })
        .add_edge("A", "Z")
        .set_start("A")
        .build();

    let runner = GraphRunner::default();
    let err = runner
        .run_graph(&graph, WorkflowState::new("x"), None)
        .await
        .unwrap_err();
    match err {
        RunnerError::NodeNotFound { node } => assert_eq!(node, "Z"),
        other => panic!("expected NodeNotFound, got {other:?}"),
    }

    // The post-A snapshot and the single-step log survive the failure.
    let store = runner.run_store();
    let run_ids = store.run_ids();
    assert_eq!(run_ids.len(), 1);
    let snapshot = store.snapshot(&run_ids[0]).unwrap();
    assert_eq!(snapshot.log, vec!["Running node: A", "ran:a"]);
    assert_eq!(store.log(&run_ids[0]).unwrap(), vec!["Running node: A"]);
}

#[tokio::test]
async fn missing_start_node_is_node_not_found() {
    let graph = GraphBuilder::new()
        .add_node("A", TagNode { tag: "a" })
        .set_start("ghost")
        .build();

    let runner = GraphRunner::default();
    let err = runner
        .run_graph(&graph, WorkflowState::new("x"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::NodeNotFound { node } if node == "ghost"));
}

#[tokio::test]
async fn node_failure_carries_the_node_name_and_cause() {
    let graph = GraphBuilder::new()
        .add_node("A", TagNode { tag: "a" })
        .add_node("B", FailingNode)
        .add_edge("A", "B")
        .set_start("A")
        .build();

    let runner = GraphRunner::default();
    let err = runner
        .run_graph(&graph, WorkflowState::new("x"), None)
        .await
        .unwrap_err();
    match err {
        RunnerError::NodeExecution { node, source } => {
            assert_eq!(node, "B");
            assert!(source.to_string().contains("forced failure"));
        }
        other => panic!("expected NodeExecution, got {other:?}"),
    }

    // A's snapshot was already written and is not rolled back.
    let store = runner.run_store();
    let run_ids = store.run_ids();
    let snapshot = store.snapshot(&run_ids[0]).unwrap();
    assert!(snapshot.log.contains(&"ran:a".to_string()));
}

#[tokio::test]
async fn observer_failure_aborts_the_run() {
    let runner = GraphRunner::default();
    let err = runner
        .run_graph(&linear_abc(), WorkflowState::new("x"), Some(&FailingObserver))
        .await
        .unwrap_err();
    match err {
        RunnerError::Observer { node, .. } => assert_eq!(node, "A"),
        other => panic!("expected Observer, got {other:?}"),
    }

    // The marker for A was recorded before the observer was notified.
    let store = runner.run_store();
    let run_ids = store.run_ids();
    assert_eq!(store.log(&run_ids[0]).unwrap(), vec!["Running node: A"]);
}

#[tokio::test]
async fn unregistered_graph_id_is_graph_not_found() {
    let runner = GraphRunner::default();
    let err = runner
        .run(
            &GraphId::from("never-registered"),
            WorkflowState::new("x"),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::GraphNotFound { .. }));
    assert!(runner.run_store().is_empty());
}

#[tokio::test]
async fn registered_graph_runs_by_id() {
    let runner = GraphRunner::default();
    let graph_id = runner.graph_registry().register(linear_abc());
    let (final_state, run_id) = runner
        .run(&graph_id, WorkflowState::new("x"), None)
        .await
        .unwrap();

    assert_eq!(final_state.log.last().unwrap(), "ran:c");
    assert!(runner.run_store().contains(&run_id));
}

#[tokio::test]
async fn sync_and_suspending_nodes_mix_in_one_walk() {
    let graph = GraphBuilder::new()
        .add_node(
            "sync",
            FnNode::from_sync(|mut state| {
                state.push_log("ran:sync");
                Ok(state)
            }),
        )
        .add_node(
            "suspending",
            FnNode::from_future(|mut state| async move {
                tokio::time::sleep(Duration::from_millis(2)).await;
                state.push_log("ran:suspending");
                Ok(state)
            }),
        )
        .add_edge("sync", "suspending")
        .set_start("sync")
        .build();

    let runner = GraphRunner::default();
    let (final_state, _) = runner
        .run_graph(&graph, WorkflowState::new("x"), None)
        .await
        .unwrap();
    assert!(final_state.log.contains(&"ran:sync".to_string()));
    assert!(final_state.log.contains(&"ran:suspending".to_string()));
}

#[tokio::test]
async fn concurrent_runs_of_one_graph_are_independent() {
    let runner = GraphRunner::default();
    let graph = GraphBuilder::new()
        .add_node("A", CounterNode { limit: 3 })
        .add_edge("A", "A")
        .set_start("A")
        .build();
    let graph_id = runner.graph_registry().register(graph);

    let (left, right) = tokio::join!(
        runner.run(&graph_id, WorkflowState::new("left"), None),
        runner.run(&graph_id, WorkflowState::new("right"), None),
    );
    let (left_state, left_id) = left.unwrap();
    let (right_state, right_id) = right.unwrap();

    assert_ne!(left_id, right_id);
    assert_eq!(left_state.chunks.len(), 3);
    assert_eq!(right_state.chunks.len(), 3);
    assert_eq!(left_state.input_text, "left");
    assert_eq!(right_state.input_text, "right");
    assert_eq!(runner.run_store().len(), 2);
}
