//! Per-tick controller
//!
//! Ties the parsers, the command queue, the scheduler and the mirror
//! tracker into one non-blocking step:
//! - Reads the clock once
//! - Takes at most one pending line and admits or rejects it
//! - Runs the scheduler (or the mirror inactivity check) once
//!
//! Everything that happened is reported back as [`Event`]s.

pub mod mirror;

use canne_protocol::{parse_lcr, parse_line, LineCommand, ParseError, ZoneSet, STOP_KEYWORD};
use heapless::Vec;

use crate::config::{DeviceConfig, DeviceMode};
use crate::scheduler::{ActuationScheduler, CommandQueue, QUEUE_CAPACITY};
use crate::state::{CommandError, Event};
use crate::traits::{Actuator, Clock, LineSource, Millis};

pub use mirror::MirrorController;

/// Most events a single tick can produce (one line, one transition)
pub const MAX_EVENTS_PER_TICK: usize = 2;

/// Events produced by one tick
pub type Events = Vec<Event, MAX_EVENTS_PER_TICK>;

/// Application controller
pub struct Controller<const N: usize = QUEUE_CAPACITY> {
    mode: DeviceMode,
    zones: ZoneSet,
    queue: CommandQueue<N>,
    scheduler: ActuationScheduler,
    mirror: MirrorController,
}

impl<const N: usize> Controller<N> {
    /// Create an idle controller with an empty queue
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            mode: config.mode,
            zones: config.zones,
            queue: CommandQueue::new(),
            scheduler: ActuationScheduler::new(),
            mirror: MirrorController::new(config.inactivity_timeout_ms),
        }
    }

    /// Pending commands
    pub fn queue(&self) -> &CommandQueue<N> {
        &self.queue
    }

    /// Scheduler state
    pub fn scheduler(&self) -> &ActuationScheduler {
        &self.scheduler
    }

    /// Mirror tracker state
    pub fn mirror(&self) -> &MirrorController {
        &self.mirror
    }

    /// Run one control step against the hardware traits
    pub fn tick<L, C, A>(&mut self, lines: &mut L, clock: &C, actuator: &mut A) -> Events
    where
        L: LineSource,
        C: Clock,
        A: Actuator,
    {
        let now = clock.now_ms();
        let line = lines.poll_line();
        self.step(line.as_deref(), now, actuator)
    }

    /// Run one control step with an already-read line and timestamp
    pub fn step<A: Actuator>(&mut self, line: Option<&str>, now: Millis, actuator: &mut A) -> Events {
        let mut events = Events::new();

        let mut stopped = false;
        if let Some(line) = line {
            let event = match self.mode {
                DeviceMode::Queued => self.handle_queued_line(line, actuator),
                DeviceMode::Mirror => self.handle_mirror_line(line, now, actuator),
            };
            stopped = matches!(event, Event::Stopped { .. });
            push(&mut events, event);
        }

        // STOP takes the whole tick; the next command starts no earlier
        // than the following one
        if stopped {
            return events;
        }

        match self.mode {
            DeviceMode::Queued => {
                if let Some(event) = self.scheduler.tick(now, &mut self.queue, actuator) {
                    push(&mut events, event.into());
                }
            }
            DeviceMode::Mirror => {
                if self.mirror.tick(now, actuator) {
                    push(&mut events, Event::InactivityCleared);
                }
            }
        }

        events
    }

    fn handle_queued_line<A: Actuator>(&mut self, line: &str, actuator: &mut A) -> Event {
        match parse_line(line) {
            Ok(LineCommand::Stop) => Event::Stopped {
                interrupted: self.scheduler.stop(actuator),
            },
            Ok(LineCommand::Actuate(command)) => {
                if !self.zones.contains(command.zone) {
                    return Event::Rejected(ParseError::UnknownZone.into());
                }
                match self.queue.enqueue(command) {
                    Ok(()) => Event::Admitted(command),
                    Err(dropped) => Event::Rejected(CommandError::QueueFull(dropped)),
                }
            }
            Err(err) => Event::Rejected(err.into()),
        }
    }

    fn handle_mirror_line<A: Actuator>(&mut self, line: &str, now: Millis, actuator: &mut A) -> Event {
        if line.trim() == STOP_KEYWORD {
            self.mirror.stop(actuator);
            return Event::Stopped { interrupted: None };
        }
        match parse_lcr(line) {
            Ok(frame) => {
                self.mirror.apply(&frame, now, actuator);
                Event::Mirrored(frame)
            }
            Err(err) => Event::Rejected(err.into()),
        }
    }
}

fn push(events: &mut Events, event: Event) {
    // At most one line event and one transition per tick
    let _ = events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ManualClock, Output, RecordingActuator, ScriptedLines};
    use crate::scheduler::SchedulerState;
    use canne_protocol::{Command, LcrFrame, Zone};

    fn queued() -> Controller {
        Controller::new(&DeviceConfig::default())
    }

    fn mirrored() -> Controller {
        Controller::new(&DeviceConfig {
            mode: DeviceMode::Mirror,
            ..Default::default()
        })
    }

    #[test]
    fn test_bringup_script_fills_queue() {
        let mut ctrl = queued();
        let mut act = RecordingActuator::new();
        let script = [
            "UPP 255 5000",
            "DRO 180 7000",
            "UPP 80 3000",
            "DRO 255 10000",
            "UPP 150 5000",
        ];

        // The first tick starts UPP 255 straight away, freeing its slot
        for line in script {
            let events = ctrl.step(Some(line), 0, &mut act);
            assert!(matches!(events[0], Event::Admitted(_)));
        }
        assert_eq!(ctrl.queue().len(), 4);
        assert_eq!(
            ctrl.scheduler().active_command(),
            Some(Command::new(Zone::Up, 255, 5000))
        );

        let events = ctrl.step(Some("BOT 10 10"), 1, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Rejected(CommandError::QueueFull(Command::new(
                Zone::Bottom,
                10,
                10
            )))]
        );
        assert_eq!(ctrl.queue().len(), 4);
    }

    #[test]
    fn test_sequential_playback() {
        let mut ctrl = queued();
        let mut act = RecordingActuator::new();
        let mut lines = ScriptedLines::new(&["GAU 100 1000", "DRO 200 500"]);
        let clock = ManualClock::new(1_000);

        // Tick 1: admit GAU and start it
        let events = ctrl.tick(&mut lines, &clock, &mut act);
        assert_eq!(events[0], Event::Admitted(Command::new(Zone::Left, 100, 1000)));
        assert!(matches!(events[1], Event::Started { deadline: 2_000, .. }));
        assert_eq!(act.level(Zone::Left), 100);

        // Tick 2: admit DRO, GAU still running
        clock.advance(1);
        let events = ctrl.tick(&mut lines, &clock, &mut act);
        assert_eq!(events.len(), 1);
        assert_eq!(ctrl.queue().len(), 1);

        // Deadline: clear only
        clock.set(2_000);
        let events = ctrl.tick(&mut lines, &clock, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Completed(Command::new(Zone::Left, 100, 1000))]
        );
        assert_eq!(act.last(), Some(Output::ClearAll));

        // Next tick: start DRO
        clock.advance(1);
        let events = ctrl.tick(&mut lines, &clock, &mut act);
        assert!(matches!(events[0], Event::Started { deadline: 2_501, .. }));
        assert_eq!(act.level(Zone::Right), 200);
        assert_eq!(act.level(Zone::Left), 0);
        assert_eq!(lines.remaining(), 0);

        // STOP cuts the running command short
        lines.push("STOP");
        clock.advance(1);
        let events = ctrl.tick(&mut lines, &clock, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Stopped {
                interrupted: Some(Command::new(Zone::Right, 200, 500))
            }]
        );
    }

    #[test]
    fn test_malformed_line_leaves_state_alone() {
        let mut ctrl = queued();
        let mut act = RecordingActuator::new();

        for line in ["XYZ 10 10", "UPP 300 10", "UPP ten 10", "UPP 10"] {
            let events = ctrl.step(Some(line), 0, &mut act);
            assert_eq!(events.len(), 1);
            assert!(events[0].is_error());
        }
        assert!(ctrl.queue().is_empty());
        assert_eq!(ctrl.scheduler().state(), SchedulerState::Idle);
        assert!(act.calls.is_empty());
    }

    #[test]
    fn test_disabled_zone_rejected() {
        let mut ctrl: Controller = Controller::new(&DeviceConfig {
            zones: ZoneSet::three_zone(),
            ..Default::default()
        });
        let mut act = RecordingActuator::new();

        let events = ctrl.step(Some("BOT 255 100"), 0, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Rejected(CommandError::MalformedLine(
                ParseError::UnknownZone
            ))]
        );
        assert!(ctrl.queue().is_empty());
    }

    #[test]
    fn test_stop_interrupts_and_keeps_queue() {
        let mut ctrl = queued();
        let mut act = RecordingActuator::new();

        let _ = ctrl.step(Some("UPP 255 5000"), 0, &mut act);
        let _ = ctrl.step(Some("DRO 100 100"), 10, &mut act);
        assert!(ctrl.scheduler().is_active());

        let events = ctrl.step(Some("STOP"), 20, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Stopped {
                interrupted: Some(Command::new(Zone::Up, 255, 5000))
            }]
        );
        assert_eq!(act.active_zones(), 0);
        assert_eq!(ctrl.scheduler().state(), SchedulerState::Idle);
        assert_eq!(ctrl.queue().len(), 1);

        // Queued command resumes on the following tick
        let events = ctrl.step(None, 21, &mut act);
        assert!(matches!(events[0], Event::Started { .. }));
        assert_eq!(act.level(Zone::Right), 100);
    }

    #[test]
    fn test_stop_when_idle_is_idempotent() {
        let mut ctrl = queued();
        let mut act = RecordingActuator::new();

        for t in 0..3 {
            let events = ctrl.step(Some("STOP"), t, &mut act);
            assert_eq!(events.as_slice(), &[Event::Stopped { interrupted: None }]);
        }
        assert!(act.calls.iter().all(|c| *c == Output::ClearAll));
        assert_eq!(ctrl.scheduler().state(), SchedulerState::Idle);
    }

    #[test]
    fn test_mirror_frames_and_timeout() {
        let mut ctrl = mirrored();
        let mut act = RecordingActuator::new();

        let events = ctrl.step(Some("L040C100R000"), 0, &mut act);
        assert_eq!(
            events.as_slice(),
            &[Event::Mirrored(LcrFrame::from_percent(40, 100, 0))]
        );
        assert_eq!(act.level(Zone::Up), 255);
        assert_eq!(act.level(Zone::Left), 102);
        assert!(ctrl.queue().is_empty());

        assert!(ctrl.step(None, 199, &mut act).is_empty());
        assert_eq!(
            ctrl.step(None, 200, &mut act).as_slice(),
            &[Event::InactivityCleared]
        );
        assert_eq!(act.active_zones(), 0);
        assert!(ctrl.step(None, 1_000, &mut act).is_empty());
    }

    #[test]
    fn test_mirror_rejects_queued_grammar() {
        let mut ctrl = mirrored();
        let mut act = RecordingActuator::new();

        let events = ctrl.step(Some("UPP 255 5000"), 0, &mut act);
        assert!(events[0].is_error());
        assert!(ctrl.queue().is_empty());
        assert!(act.calls.is_empty());
    }

    #[test]
    fn test_mirror_stop() {
        let mut ctrl = mirrored();
        let mut act = RecordingActuator::new();

        let _ = ctrl.step(Some("L100C100R100"), 0, &mut act);
        let events = ctrl.step(Some("STOP"), 5, &mut act);
        assert_eq!(events.as_slice(), &[Event::Stopped { interrupted: None }]);
        assert_eq!(act.active_zones(), 0);
        assert!(!ctrl.mirror().is_active());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn line_strategy() -> impl Strategy<Value = Option<&'static str>> {
            prop::sample::select(std::vec![
                None,
                Some("UPP 255 30"),
                Some("GAU 100 0"),
                Some("DRO 180 70"),
                Some("BOT 10 5"),
                Some("STOP"),
                Some("XYZ 1 1"),
            ])
        }

        proptest! {
            /// At most one zone is ever driven in queued mode, and the
            /// queue never exceeds its capacity.
            #[test]
            fn one_zone_at_a_time(
                steps in prop::collection::vec((line_strategy(), 0u64..50), 0..200)
            ) {
                let mut ctrl = queued();
                let mut act = RecordingActuator::new();
                let mut now = 0;
                for (line, dt) in steps {
                    now += dt;
                    let _ = ctrl.step(line, now, &mut act);
                    prop_assert!(act.active_zones() <= 1);
                    prop_assert!(ctrl.queue().len() <= 4);
                    if !ctrl.scheduler().is_active() {
                        prop_assert_eq!(act.active_zones(), 0);
                    }
                }
            }
        }
    }
}
