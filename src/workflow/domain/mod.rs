//! Domain model for task lifecycle management.
//!
//! The workflow domain models task creation, writer acceptance, the status
//! state machine, and reassignment rounds while keeping all infrastructure
//! concerns outside of the domain boundary.

mod error;
mod ids;
mod reassignment;
mod status;
mod task;

pub use error::{ParseTaskStatusError, WorkflowDomainError};
pub use ids::{FunctionRef, RoundNumber, TaskId};
pub use reassignment::{ReassignmentId, ReassignmentRecord, ReassignmentSnapshot};
pub use status::TaskStatus;
pub use task::{NewTaskParams, PersistedTaskData, Task, WriterPair};
