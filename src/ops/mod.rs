pub mod snap;
pub mod task_ops;
