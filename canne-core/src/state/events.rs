//! Controller events and command errors

use canne_protocol::{Command, LcrFrame, ParseError};

use crate::scheduler::SchedulerEvent;
use crate::traits::Millis;

/// Why an incoming line did not turn into queued work
///
/// Both kinds are local and recoverable: the line is dropped and the loop
/// carries on. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Unparsable fields or an unknown zone code
    MalformedLine(ParseError),
    /// The queue was full; the newest command is dropped
    QueueFull(Command),
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        CommandError::MalformedLine(err)
    }
}

/// Something that happened during a controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Command parsed and queued
    Admitted(Command),
    /// Line rejected
    Rejected(CommandError),
    /// STOP received; outputs cleared
    Stopped { interrupted: Option<Command> },
    /// Queued command started driving its zone
    Started { command: Command, deadline: Millis },
    /// Active command reached its deadline; outputs cleared
    Completed(Command),
    /// Mirror frame applied to all zones
    Mirrored(LcrFrame),
    /// No mirror frame within the inactivity window; outputs cleared
    InactivityCleared,
}

impl Event {
    /// Check if this event reports a dropped line
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Rejected(_))
    }
}

impl From<SchedulerEvent> for Event {
    fn from(event: SchedulerEvent) -> Self {
        match event {
            SchedulerEvent::Started { command, deadline } => Event::Started { command, deadline },
            SchedulerEvent::Completed(command) => Event::Completed(command),
        }
    }
}
