// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tokio::time::{sleep, Duration};

use crate::core::events::Event;
use crate::core::msg::TimerMsg;
use crate::core::utils::now_secs;
use crate::services::idle::IdleSensor;
use crate::{pinfo, pwarn};

/// 1 Hz heartbeat. Each beat carries the wall clock and the current idle
/// sensor reading; the daemon task applies them in order, so ticks can never
/// overlap with each other or with commands.
pub async fn run_ticker(tx: Sender<TimerMsg>, sensor: Arc<dyn IdleSensor + Send + Sync>) {
    pinfo!("ticker", "started");

    loop {
        sleep(Duration::from_secs(1)).await;

        let event = Event::Tick {
            now: now_secs(),
            idle: sensor.current_idle_seconds(),
        };

        // If the daemon is gone, stop.
        if tx.send(TimerMsg::Event(event)).await.is_err() {
            pwarn!("ticker", "stopping (receiver dropped)");
            break;
        }
    }
}
