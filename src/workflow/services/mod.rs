//! Application services for task lifecycle orchestration.

mod lifecycle;
mod reassignment;

pub use lifecycle::{CreateTaskRequest, TaskLifecycleService};
pub use reassignment::{ReassignTaskRequest, ReassignmentOutcome, ReassignmentService};
