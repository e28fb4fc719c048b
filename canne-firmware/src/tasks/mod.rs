//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod control;
#[cfg(feature = "demo-script")]
pub mod demo;
pub mod serial_rx;

pub use control::{led_control_task, pwm_control_task};
#[cfg(feature = "demo-script")]
pub use demo::demo_task;
pub use serial_rx::serial_rx_task;
