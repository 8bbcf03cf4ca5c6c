// Author: Dustin Pilgrim
// License: MIT

mod run;

use tokio::sync::watch;

use crate::core::{
    events::Command,
    snapshot::StatusSnapshot,
    store::SettingsStore,
    timer::SittingTimer,
    utils::{format_compact, now_secs},
};
use crate::pdebug;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub struct Daemon {
    timer: SittingTimer,

    status_tx: watch::Sender<StatusSnapshot>,
    last_published: StatusSnapshot,
}

impl Daemon {
    /// Builds the daemon around a loaded timer. Returns the watch receiver so
    /// in-process observers can follow published snapshots.
    pub fn new(store: Box<dyn SettingsStore>) -> (Self, watch::Receiver<StatusSnapshot>) {
        let timer = SittingTimer::load(store, now_secs());
        let snapshot = StatusSnapshot::of(&timer);

        let (status_tx, status_rx) = watch::channel(snapshot.clone());

        let daemon = Self {
            timer,
            status_tx,
            last_published: snapshot,
        };

        (daemon, status_rx)
    }

    /// Applies one command on the daemon task and produces the reply line.
    /// Commands are total; the reply reports what actually happened,
    /// including clamping.
    fn apply_command(&mut self, cmd: Command) -> String {
        let now = now_secs();

        let reply = match cmd {
            Command::Start => {
                self.timer.start(now);
                "Sitting timer started".to_string()
            }
            Command::Pause => {
                self.timer.pause();
                format!(
                    "Sitting timer paused at {}",
                    format_compact(self.timer.displayed_elapsed())
                )
            }
            Command::Reset => {
                self.timer.reset(now);
                "Elapsed time reset".to_string()
            }
            Command::FastForward { seconds } => {
                self.timer.fast_forward(now, seconds);
                format!(
                    "Fast-forwarded {}s (elapsed now {})",
                    seconds,
                    format_compact(self.timer.displayed_elapsed())
                )
            }
            Command::SetThresholds { yellow, red } => {
                let t = self.timer.update_thresholds(yellow, red);
                format!(
                    "Thresholds set: yellow at {}, red at {}",
                    format_compact(t.yellow),
                    format_compact(t.red)
                )
            }
            Command::SetIdleReset { seconds } => {
                let v = self.timer.update_idle_reset(seconds);
                format!("Idle reset set to {}", format_compact(v))
            }
            Command::SimulateIdle { on } => {
                self.timer.set_simulate_idle(on);
                format!("Idle simulation {}", if on { "on" } else { "off" })
            }
        };

        pdebug!("daemon", "command applied: {}", reply);
        reply
    }

    /// Publishes the current state if anything observable changed. Called
    /// after every handled message, so subscribers always see fully-settled
    /// fields.
    fn publish(&mut self) {
        let snapshot = StatusSnapshot::of(&self.timer);
        if snapshot != self.last_published {
            self.last_published = snapshot.clone();
            let _ = self.status_tx.send(snapshot);
        }
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::of(&self.timer)
    }
}
