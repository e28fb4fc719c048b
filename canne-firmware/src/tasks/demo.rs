//! Scripted command source
//!
//! Replays the bring-up command script into the line channel, as if a host
//! had sent it.

use defmt::*;
use embassy_time::Timer;

use canne_protocol::Line;

use crate::channels::LINE_CHANNEL;

/// Bring-up script
const SCRIPT: [&str; 5] = [
    "UPP 255 5000",
    "DRO 180 7000",
    "UPP 80 3000",
    "DRO 255 10000",
    "UPP 150 5000",
];

/// Delay before the script starts (ms)
const START_DELAY_MS: u64 = 1000;

/// Demo task - sends the script once
#[embassy_executor::task]
pub async fn demo_task() {
    info!("Demo script starting in {} ms", START_DELAY_MS);
    Timer::after_millis(START_DELAY_MS).await;

    for text in SCRIPT {
        let Ok(line) = Line::try_from(text) else {
            warn!("Script line too long: {}", text);
            continue;
        };
        // Queue behind anything the host already sent
        LINE_CHANNEL.send(line).await;
    }

    info!("Demo script sent");
}
