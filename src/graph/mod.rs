pub mod task_graph;
pub mod topological;

pub use task_graph::TaskGraph;
pub use topological::{TopologicalOrder, topological_order};
