//! Canne - Haptic Guidance Firmware
//!
//! Main firmware binary for RP2040-based smart cane boards. Receives short
//! serial commands from the host and drives one vibration motor (or LED) per
//! body zone without ever blocking the control loop.
//!
//! Board wiring:
//! - UART0 RX on GPIO1 (host link)
//! - PWM motors: up GPIO10, right GPIO11, bottom GPIO12, left GPIO13
//! - WS2812 data on GPIO16 (LED strip back end)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx, Config as UartConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use canne_core::config::{ActuatorBackend, DeviceConfig};
use canne_core::Zone;
use canne_drivers::PwmActuator;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cell for the UART receive buffer (must live forever)
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Canne firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Host link: receive only
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;
    let rx_buf = RX_BUF.init([0u8; 256]);
    let rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, rx_buf, uart_config);
    info!("UART initialized at {} baud", config.baudrate);

    match config.backend {
        ActuatorBackend::Pwm => {
            let pwm_config = pwm_config(&config);
            let slice5 = Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, pwm_config.clone());
            let slice6 = Pwm::new_output_ab(p.PWM_SLICE6, p.PIN_12, p.PIN_13, pwm_config);
            let (up, right) = slice5.split();
            let (bottom, left) = slice6.split();

            // Channels indexed by zone; zones left out of the config stay unwired
            let mut channels = [None, None, None, None];
            for (zone, channel) in [
                (Zone::Up, up),
                (Zone::Left, left),
                (Zone::Right, right),
                (Zone::Bottom, bottom),
            ] {
                if config.zones.contains(zone) {
                    channels[zone.index()] = channel;
                }
            }
            let outputs = PwmActuator::new(channels);

            spawner
                .spawn(tasks::pwm_control_task(config, outputs))
                .unwrap();
        }
        ActuatorBackend::LedStrip => {
            let Pio {
                mut common, sm0, ..
            } = Pio::new(p.PIO0, Irqs);
            let program = PioWs2812Program::new(&mut common);
            let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_16, &program);

            spawner
                .spawn(tasks::led_control_task(config, ws2812))
                .unwrap();
        }
    }
    info!("Outputs initialized ({:?})", config.backend);

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();

    #[cfg(feature = "demo-script")]
    spawner.spawn(tasks::demo_task()).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// PWM slice configuration shared by every motor channel
fn pwm_config(config: &DeviceConfig) -> PwmConfig {
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = config.pwm.top;
    pwm_config.divider = config.pwm.divider.into();
    pwm_config.compare_a = 0; // Start at 0% duty
    pwm_config.compare_b = 0;
    pwm_config
}
