//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use canne_protocol::Line;

/// Channel capacity for assembled lines
const LINE_CHANNEL_SIZE: usize = 8;

/// Complete lines from the serial link (or the demo script)
///
/// Producers never wait: a line that does not fit is dropped and logged.
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> =
    Channel::new();
