use construction_schedule::calculations::{BackwardPass, ForwardPass};
use construction_schedule::{Task, TaskGraph, topological_order};

#[test]
fn backward_pass_computes_late_times_across_dag() {
    // A(2) -> {B(3), C(5)} -> D(1)
    let graph = TaskGraph::from_tasks(vec![
        Task::new("A", "A", 2.0),
        Task::new("B", "B", 3.0).with_predecessors(["A"]),
        Task::new("C", "C", 5.0).with_predecessors(["A"]),
        Task::new("D", "D", 1.0).with_predecessors(["B", "C"]),
    ])
    .unwrap();
    let order = topological_order(&graph).unwrap();
    let durations = graph.durations();
    let early = ForwardPass::new(&graph, &order).execute(&durations);
    let late = BackwardPass::new(&graph, &order).execute(&durations, early.project_duration);

    assert_eq!(late.late_finish, vec![2.0, 7.0, 7.0, 8.0]);
    assert_eq!(late.late_start, vec![0.0, 4.0, 2.0, 7.0]);
}

#[test]
fn terminal_tasks_finish_at_project_duration() {
    // Two independent branches; the short one may slip to the project end.
    let graph = TaskGraph::from_tasks(vec![
        Task::new("LONG", "Long", 10.0),
        Task::new("SHORT", "Short", 4.0),
    ])
    .unwrap();
    let order = topological_order(&graph).unwrap();
    let durations = graph.durations();
    let late = BackwardPass::new(&graph, &order).execute(&durations, 10.0);
    assert_eq!(late.late_finish, vec![10.0, 10.0]);
    assert_eq!(late.late_start, vec![0.0, 6.0]);
}

#[test]
fn late_finish_is_minimum_successor_late_start() {
    let graph = TaskGraph::from_tasks(vec![
        Task::new("A", "A", 1.0),
        Task::new("B", "B", 6.0).with_predecessors(["A"]),
        Task::new("C", "C", 2.0).with_predecessors(["A"]),
    ])
    .unwrap();
    let order = topological_order(&graph).unwrap();
    let durations = graph.durations();
    let late = BackwardPass::new(&graph, &order).execute(&durations, 7.0);
    // B must start by 1, C by 5; A must finish by the earlier of the two.
    assert_eq!(late.late_start, vec![0.0, 1.0, 5.0]);
    assert_eq!(late.late_finish[0], 1.0);
}
