//! Actuation scheduler
//!
//! Single active-slot state machine. Each tick it either waits for the
//! active action's deadline, clears the outputs once the deadline has
//! passed, or starts the next queued command. It never sleeps: a pending
//! deadline is simply re-checked on the next tick.

use canne_protocol::Command;

use super::queue::CommandQueue;
use crate::traits::{Actuator, Millis};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// No output is driven
    Idle,
    /// One zone is driven until `deadline`
    Active { deadline: Millis },
}

/// Transition reported by a scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerEvent {
    /// A command was dequeued and its zone driven
    Started { command: Command, deadline: Millis },
    /// The active command reached its deadline and outputs were cleared
    Completed(Command),
}

#[derive(Debug, Clone, Copy)]
struct ActiveAction {
    command: Command,
    deadline: Millis,
}

/// Actuation scheduler
///
/// Holds at most one active action. A new action only starts on a tick
/// where the scheduler was already idle, so a finished action is always
/// cleared before the next one is applied.
#[derive(Debug, Clone, Default)]
pub struct ActuationScheduler {
    active: Option<ActiveAction>,
}

impl ActuationScheduler {
    /// Create an idle scheduler
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Get the current state
    pub fn state(&self) -> SchedulerState {
        match self.active {
            Some(active) => SchedulerState::Active {
                deadline: active.deadline,
            },
            None => SchedulerState::Idle,
        }
    }

    /// Check if an action is in progress
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Command currently being played, if any
    pub fn active_command(&self) -> Option<Command> {
        self.active.map(|a| a.command)
    }

    /// Run one scheduling step
    ///
    /// Performs at most one transition:
    /// 1. active, deadline not reached: nothing
    /// 2. active, deadline reached: clear outputs, go idle
    /// 3. idle, queue not empty: start the oldest command
    /// 4. idle, queue empty: nothing
    pub fn tick<A: Actuator, const N: usize>(
        &mut self,
        now: Millis,
        queue: &mut CommandQueue<N>,
        actuator: &mut A,
    ) -> Option<SchedulerEvent> {
        if let Some(active) = self.active {
            if now < active.deadline {
                return None;
            }
            actuator.clear_all();
            self.active = None;
            return Some(SchedulerEvent::Completed(active.command));
        }

        let command = queue.dequeue()?;
        actuator.apply_zone(command.zone, command.intensity);
        let deadline = now.saturating_add(Millis::from(command.duration_ms));
        self.active = Some(ActiveAction { command, deadline });

        Some(SchedulerEvent::Started { command, deadline })
    }

    /// Cancel the active action
    ///
    /// Clears all outputs regardless of the deadline and returns the
    /// interrupted command. When already idle this only re-asserts zero
    /// outputs. Queued commands are kept.
    pub fn stop<A: Actuator>(&mut self, actuator: &mut A) -> Option<Command> {
        actuator.clear_all();
        self.active.take().map(|a| a.command)
    }
}
