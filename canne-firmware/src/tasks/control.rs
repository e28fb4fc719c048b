//! Control loop task
//!
//! Runs the controller once per tick against the real clock, the line
//! channel and whichever output back end the board carries, and logs
//! every event it reports.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::{Grb, PioWs2812};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Instant, Ticker};

use canne_core::config::{DeviceConfig, MAX_PIXELS};
use canne_core::controller::Controller;
use canne_core::state::{CommandError, Event};
use canne_core::traits::{Actuator, Clock, LineSource, Millis};
use canne_core::{LcrFrame, Zone};
use canne_drivers::{LedStripActuator, PwmActuator};
use canne_protocol::Line;

use crate::channels::LINE_CHANNEL;

/// WS2812 driver on PIO0 state machine 0
pub type Ws2812 = PioWs2812<'static, PIO0, 0, MAX_PIXELS, Grb>;

/// Monotonic time from the embassy time driver
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> Millis {
        Instant::now().as_millis()
    }
}

/// Non-blocking view of the line channel
struct ChannelLineSource;

impl LineSource for ChannelLineSource {
    fn poll_line(&mut self) -> Option<Line> {
        LINE_CHANNEL.try_receive().ok()
    }
}

/// An output back end as seen by the control loop
///
/// Zone writes are synchronous; `flush` pushes buffered state out to
/// hardware that needs an async transfer.
trait Outputs: Actuator {
    async fn flush(&mut self) {}
}

impl Outputs for PwmActuator<PwmOutput<'static>> {}

/// LED strip pixels plus the PIO driver that writes them
struct LedOutputs {
    strip: LedStripActuator<MAX_PIXELS>,
    ws2812: Ws2812,
}

impl Actuator for LedOutputs {
    fn apply_zone(&mut self, zone: Zone, intensity: u8) {
        self.strip.apply_zone(zone, intensity);
    }

    fn clear_all(&mut self) {
        self.strip.clear_all();
    }

    fn apply_frame(&mut self, frame: &LcrFrame) {
        self.strip.apply_frame(frame);
    }
}

impl Outputs for LedOutputs {
    async fn flush(&mut self) {
        if let Some(frame) = self.strip.take_frame() {
            self.ws2812.write(&frame).await;
        }
    }
}

/// Control task for PWM vibration motors
#[embassy_executor::task]
pub async fn pwm_control_task(
    config: DeviceConfig,
    outputs: PwmActuator<PwmOutput<'static>>,
) {
    info!("Control task started (PWM, {} zones)", outputs.fitted().len());
    run(config, outputs).await
}

/// Control task for the WS2812 debugging strip
#[embassy_executor::task]
pub async fn led_control_task(config: DeviceConfig, ws2812: Ws2812) {
    info!("Control task started (LED strip)");
    let strip = LedStripActuator::new(&config.led_strip);
    run(config, LedOutputs { strip, ws2812 }).await
}

async fn run<O: Outputs>(config: DeviceConfig, mut outputs: O) -> ! {
    let mut controller: Controller = Controller::new(&config);
    let mut lines = ChannelLineSource;
    let clock = EmbassyClock;

    outputs.clear_all();
    outputs.flush().await;

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.tick_interval_ms)));

    loop {
        ticker.next().await;

        for event in controller.tick(&mut lines, &clock, &mut outputs) {
            log_event(&event);
        }
        outputs.flush().await;
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Admitted(cmd) => debug!(
            "Queued {} {} for {} ms",
            cmd.zone.code(),
            cmd.intensity,
            cmd.duration_ms
        ),
        Event::Rejected(CommandError::QueueFull(cmd)) => {
            warn!("Queue full, dropped {} command", cmd.zone.code())
        }
        Event::Rejected(CommandError::MalformedLine(e)) => warn!("Rejected line: {:?}", e),
        Event::Stopped { interrupted } => info!("STOP (interrupted {:?})", interrupted),
        Event::Started { command, deadline } => info!(
            "Driving {} at {} until {}",
            command.zone.code(),
            command.intensity,
            deadline
        ),
        Event::Completed(cmd) => debug!("{} done, outputs cleared", cmd.zone.code()),
        Event::Mirrored(frame) => trace!(
            "Frame L:{} C:{} R:{}",
            frame.left,
            frame.center,
            frame.right
        ),
        Event::InactivityCleared => info!("No frame received, outputs cleared"),
    }
}
