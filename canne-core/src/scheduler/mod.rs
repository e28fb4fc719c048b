//! Command queue and actuation scheduler
//!
//! Buffers admitted commands and plays them back one at a time, tracking
//! when the active one has to be switched off.

pub mod executor;
pub mod queue;

pub use executor::{ActuationScheduler, SchedulerEvent, SchedulerState};
pub use queue::{CommandQueue, QUEUE_CAPACITY};
