use construction_schedule::{ScheduleError, Task, TaskGraph, topological_order};

fn task(id: &str, preds: &[&str]) -> Task {
    Task::new(id, id, 1.0).with_predecessors(preds.iter().copied())
}

fn ordered_ids(tasks: Vec<Task>) -> Vec<String> {
    let graph = TaskGraph::from_tasks(tasks).unwrap();
    let order = topological_order(&graph).unwrap();
    order.ids(&graph).into_iter().map(str::to_owned).collect()
}

#[test]
fn chain_orders_in_dependency_order() {
    assert_eq!(
        ordered_ids(vec![task("C", &["B"]), task("B", &["A"]), task("A", &[])]),
        vec!["A", "B", "C"]
    );
}

#[test]
fn ready_tasks_are_served_first_in_first_out() {
    // Roots keep input order, then released successors join the back of the
    // queue in input order.
    let ids = ordered_ids(vec![
        task("R1", &[]),
        task("X", &["R2"]),
        task("R2", &[]),
        task("Y", &["R1"]),
        task("Z", &["R1"]),
    ]);
    assert_eq!(ids, vec!["R1", "R2", "Y", "Z", "X"]);
}

#[test]
fn diamond_releases_join_only_after_both_branches() {
    let ids = ordered_ids(vec![
        task("A", &[]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &["B", "C"]),
    ]);
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
}

#[test]
fn every_task_follows_its_predecessors() {
    let tasks = vec![
        task("F", &["D", "E"]),
        task("E", &["B"]),
        task("D", &["B", "C"]),
        task("C", &["A"]),
        task("B", &["A"]),
        task("A", &[]),
    ];
    let graph = TaskGraph::from_tasks(tasks).unwrap();
    let order = topological_order(&graph).unwrap();
    assert_eq!(order.len(), graph.len());

    let position: std::collections::HashMap<usize, usize> =
        order.iter().enumerate().map(|(pos, idx)| (idx, pos)).collect();
    for idx in 0..graph.len() {
        for &pred in graph.predecessors_of(idx) {
            assert!(position[&pred] < position[&idx]);
        }
    }
}

#[test]
fn empty_graph_has_empty_order() {
    let graph = TaskGraph::empty();
    let order = topological_order(&graph).unwrap();
    assert!(order.is_empty());
}

#[test]
fn two_task_cycle_fails_with_unresolved_tasks() {
    let graph = TaskGraph::from_tasks(vec![task("A", &["B"]), task("B", &["A"])]).unwrap();
    let err = topological_order(&graph).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Cycle {
            unresolved: vec!["A".into(), "B".into()]
        }
    );
    assert!(err.to_string().starts_with("cycle detected in predecessors"));
}

#[test]
fn self_dependency_is_a_cycle() {
    let graph = TaskGraph::from_tasks(vec![task("A", &[]), task("B", &["B"])]).unwrap();
    let err = topological_order(&graph).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Cycle {
            unresolved: vec!["B".into()]
        }
    );
}

#[test]
fn dangling_predecessor_surfaces_as_cycle_error() {
    let graph = TaskGraph::from_tasks(vec![
        task("A", &[]),
        task("B", &["A", "MISSING"]),
        task("C", &["B"]),
    ])
    .unwrap();
    let err = topological_order(&graph).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Cycle {
            unresolved: vec!["B".into(), "C".into()]
        }
    );
}
