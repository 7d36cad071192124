use construction_schedule::simulation::percentile_of_sorted;
use construction_schedule::{SimulationConfig, Task, TaskGraph, critical_path, simulate};
use proptest::prelude::*;

// Acyclic by construction: task i may only depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        (
            proptest::collection::vec(0.0..30.0f64, num_tasks),
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), num_tasks),
        )
            .prop_map(|(durations, raw_deps)| {
                durations
                    .into_iter()
                    .zip(raw_deps)
                    .enumerate()
                    .map(|(i, (duration, deps))| {
                        let preds: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            deps.into_iter().map(|d| format!("T{}", d % i)).collect()
                        };
                        Task::new(format!("T{i}"), format!("Task {i}"), duration)
                            .with_predecessors(preds)
                    })
                    .collect()
            })
    })
}

fn estimated(tasks: Vec<Task>) -> Vec<Task> {
    tasks
        .into_iter()
        .map(|task| {
            let d = task.duration_days();
            task.with_estimate(d * 0.5, d, d * 2.0)
        })
        .collect()
}

proptest! {
    #[test]
    fn floats_are_non_negative_and_some_task_is_critical(tasks in dag_strategy(12)) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let result = critical_path(&graph).unwrap();

        for timing in result.timings() {
            prop_assert!(timing.total_float >= -1e-9);
            prop_assert!(timing.early_finish <= result.project_duration_days() + 1e-9);
        }
        prop_assert!(!result.critical_tasks().is_empty());

        let max_ef = result
            .timings()
            .iter()
            .map(|t| t.early_finish)
            .fold(0.0, f64::max);
        prop_assert_eq!(result.project_duration_days(), max_ef);
    }

    #[test]
    fn every_task_starts_after_its_predecessors_finish(tasks in dag_strategy(12)) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let result = critical_path(&graph).unwrap();

        for task in graph.tasks() {
            let timing = result.get(task.id()).unwrap();
            for pred in task.predecessors() {
                let pred_timing = result.get(pred).unwrap();
                prop_assert!(timing.early_start >= pred_timing.early_finish);
            }
        }
    }

    #[test]
    fn simulated_percentiles_are_monotone(tasks in dag_strategy(8), seed in any::<u64>()) {
        let graph = TaskGraph::from_tasks(estimated(tasks)).unwrap();
        let config = SimulationConfig {
            percentiles: vec![0.0, 10.0, 50.0, 80.0, 90.0, 100.0],
            ..SimulationConfig::new(64, seed)
        };
        let report = simulate(&graph, &config).unwrap();
        for pair in report.percentiles.windows(2) {
            prop_assert!(pair[0].duration_days <= pair[1].duration_days);
        }
        prop_assert_eq!(report.get(0.0), Some(report.min_days));
        prop_assert_eq!(report.get(100.0), Some(report.max_days));
    }

    #[test]
    fn percentile_is_non_decreasing_and_bounded(
        mut samples in proptest::collection::vec(-1.0e6..1.0e6f64, 1..200),
        p1 in 0.0..=100.0f64,
        p2 in 0.0..=100.0f64,
    ) {
        samples.sort_by(f64::total_cmp);
        let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        let a = percentile_of_sorted(&samples, lo).unwrap();
        let b = percentile_of_sorted(&samples, hi).unwrap();
        prop_assert!(a <= b);
        prop_assert!(a >= samples[0]);
        prop_assert!(b <= samples[samples.len() - 1]);
    }
}
