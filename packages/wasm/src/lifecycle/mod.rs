//! Task scheduling and the rebuild lifecycle of a view.

mod coordinator;
mod scheduler;

pub use coordinator::LifecycleCoordinator;
pub use scheduler::{Scheduler, TaskGuard};
