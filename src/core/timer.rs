// Author: Dustin Pilgrim
// License: MIT

use crate::core::store::{keys, SettingsStore};
use crate::core::utils::format_compact;

const MIN_YELLOW_SECONDS: u64 = 60;
const MIN_RED_GAP_SECONDS: u64 = 60;
const MIN_IDLE_RESET_SECONDS: u64 = 60;

const DEFAULT_YELLOW_SECONDS: u64 = 45 * 60;
const DEFAULT_RED_SECONDS: u64 = 90 * 60;
const DEFAULT_IDLE_RESET_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Idle,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Idle => "idle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Phase::Running),
            "paused" => Some(Phase::Paused),
            "idle" => Some(Phase::Idle),
            _ => None,
        }
    }
}

/// Color zone boundaries, in seconds of elapsed sitting time. Stored and
/// clamped here; acted on only by presentation consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub yellow: u64,
    pub red: u64,
}

impl Thresholds {
    /// Invariant: yellow >= 60 and red >= yellow + 60. Applied on every
    /// write so programmatic misuse cannot store an invalid pair.
    pub fn clamped(yellow: u64, red: u64) -> Self {
        let yellow = yellow.max(MIN_YELLOW_SECONDS);
        let red = red.max(yellow + MIN_RED_GAP_SECONDS);
        Self { yellow, red }
    }
}

/// The session/idle state machine.
///
/// Reconciles wall-clock time, persisted state, the idle sensor reading, and
/// user commands into one consistent elapsed-time value. All commands are
/// total: invalid transitions no-op, out-of-range inputs are clamped. Every
/// durable mutation is written to the settings store before the caller can
/// observe the new state, so a crash loses at most an in-memory notification.
///
/// Time is injected (`now` as epoch seconds) rather than read internally,
/// which is what makes restart reconstruction and the tick tests exact.
pub struct SittingTimer {
    store: Box<dyn SettingsStore>,

    phase: Phase,
    session_start: Option<f64>,
    paused_elapsed: u64,

    // The value shown to the user. While Running it is recomputed each tick;
    // for Paused and Idle it *is* the frozen value, not a stopped computation.
    displayed_elapsed: u64,
    idle_seconds: u64,

    thresholds: Thresholds,
    idle_reset_seconds: u64,

    // Debug hook: substitute an over-threshold idle reading on every tick.
    simulate_idle: bool,
}

impl SittingTimer {
    /// Loads persisted state, substituting defaults for anything absent or
    /// corrupt. A persisted Running phase with no session start is recovered
    /// as a fresh session beginning now.
    pub fn load(store: Box<dyn SettingsStore>, now: f64) -> Self {
        let mut store = store;

        let yellow = read_u64(&*store, keys::YELLOW_THRESHOLD).unwrap_or(DEFAULT_YELLOW_SECONDS);
        let red = read_u64(&*store, keys::RED_THRESHOLD).unwrap_or(DEFAULT_RED_SECONDS);
        let thresholds = Thresholds::clamped(yellow, red);

        let idle_reset_seconds = read_u64(&*store, keys::IDLE_RESET_SECONDS)
            .unwrap_or(DEFAULT_IDLE_RESET_SECONDS)
            .max(MIN_IDLE_RESET_SECONDS);

        let phase = store
            .get_str(keys::STATE)
            .and_then(|s| Phase::from_str(&s))
            .unwrap_or(Phase::Running);

        let paused_elapsed = read_u64(&*store, keys::PAUSED_ELAPSED).unwrap_or(0);
        let mut session_start = store.get_f64(keys::SESSION_START);

        if phase == Phase::Running && session_start.is_none() {
            session_start = Some(now);
            store.set_f64(keys::SESSION_START, now);
        }

        let displayed_elapsed = match phase {
            Phase::Running => elapsed_since(session_start, now),
            Phase::Paused => paused_elapsed,
            Phase::Idle => 0,
        };

        Self {
            store,
            phase,
            session_start,
            paused_elapsed,
            displayed_elapsed,
            idle_seconds: 0,
            thresholds,
            idle_reset_seconds,
            simulate_idle: false,
        }
    }

    // ---------------- observable state ----------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn displayed_elapsed(&self) -> u64 {
        self.displayed_elapsed
    }

    pub fn idle_seconds(&self) -> u64 {
        self.idle_seconds
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn idle_reset_seconds(&self) -> u64 {
        self.idle_reset_seconds
    }

    pub fn simulate_idle(&self) -> bool {
        self.simulate_idle
    }

    pub fn tooltip(&self) -> String {
        format!(
            "Sitting: {} \u{2022} Idle: {}m",
            format_compact(self.displayed_elapsed),
            self.idle_seconds / 60
        )
    }

    // ---------------- commands ----------------

    pub fn start(&mut self, now: f64) {
        match self.phase {
            Phase::Running => {}
            Phase::Paused => {
                // Resume with elapsed continuity: back-date the session start
                // so elapsed picks up exactly where it was frozen.
                let start = now - self.paused_elapsed as f64;
                self.set_session_start(Some(start));
                self.set_phase(Phase::Running);
            }
            Phase::Idle => {
                self.set_session_start(Some(now));
                self.set_phase(Phase::Running);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Paused {
            return;
        }
        self.paused_elapsed = self.displayed_elapsed;
        self.store
            .set_i64(keys::PAUSED_ELAPSED, self.paused_elapsed as i64);
        self.set_session_start(None);
        self.set_phase(Phase::Paused);
    }

    /// Zeroes the elapsed counter without changing phase.
    pub fn reset(&mut self, now: f64) {
        self.displayed_elapsed = 0;
        match self.phase {
            Phase::Running => {
                self.set_session_start(Some(now));
            }
            Phase::Paused => {
                self.paused_elapsed = 0;
                self.store.set_i64(keys::PAUSED_ELAPSED, 0);
            }
            Phase::Idle => {}
        }
    }

    /// Debug/testing aid: shifts elapsed time forward (or back, floored at
    /// zero) without waiting for real time to pass.
    pub fn fast_forward(&mut self, now: f64, seconds: i64) {
        if seconds == 0 {
            return;
        }
        match self.phase {
            Phase::Running => {
                if let Some(start) = self.session_start {
                    let new_start = start - seconds as f64;
                    self.set_session_start(Some(new_start));
                    self.displayed_elapsed = elapsed_since(Some(new_start), now);
                }
            }
            Phase::Paused => {
                self.paused_elapsed = self.paused_elapsed.saturating_add_signed(seconds);
                self.displayed_elapsed = self.paused_elapsed;
                self.store
                    .set_i64(keys::PAUSED_ELAPSED, self.paused_elapsed as i64);
            }
            Phase::Idle => {}
        }
    }

    /// Returns the clamped pair that was actually stored.
    pub fn update_thresholds(&mut self, yellow: u64, red: u64) -> Thresholds {
        self.thresholds = Thresholds::clamped(yellow, red);
        self.store
            .set_i64(keys::YELLOW_THRESHOLD, self.thresholds.yellow as i64);
        self.store
            .set_i64(keys::RED_THRESHOLD, self.thresholds.red as i64);
        self.thresholds
    }

    /// Returns the clamped value that was actually stored.
    pub fn update_idle_reset(&mut self, seconds: u64) -> u64 {
        self.idle_reset_seconds = seconds.max(MIN_IDLE_RESET_SECONDS);
        self.store
            .set_i64(keys::IDLE_RESET_SECONDS, self.idle_reset_seconds as i64);
        self.idle_reset_seconds
    }

    pub fn set_simulate_idle(&mut self, on: bool) {
        self.simulate_idle = on;
    }

    // ---------------- tick ----------------

    /// One logical second of the clock. `idle` is the sensor reading; `None`
    /// means the sensor could not answer and the previous value holds.
    pub fn tick(&mut self, now: f64, idle: Option<f64>) {
        if self.simulate_idle {
            self.idle_seconds = self.idle_reset_seconds + 1;
        } else if let Some(idle) = idle {
            self.idle_seconds = idle.max(0.0) as u64;
        }

        // Idle detection never interrupts an explicit pause.
        if self.phase != Phase::Paused {
            if self.idle_seconds >= self.idle_reset_seconds {
                if self.phase != Phase::Idle {
                    // End the session. displayed_elapsed keeps its last
                    // computed value; it is the frozen display.
                    self.set_session_start(None);
                    self.set_phase(Phase::Idle);
                }
            } else if self.phase == Phase::Idle {
                // Input resumed after a long idle: begin a new session.
                self.set_session_start(Some(now));
                self.set_phase(Phase::Running);
            }
        }

        if self.phase == Phase::Running {
            self.displayed_elapsed = elapsed_since(self.session_start, now);
        }
    }

    // ---------------- persisted mutations ----------------

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.store.set_str(keys::STATE, phase.as_str());
    }

    fn set_session_start(&mut self, start: Option<f64>) {
        self.session_start = start;
        match start {
            Some(epoch) => self.store.set_f64(keys::SESSION_START, epoch),
            None => self.store.remove(keys::SESSION_START),
        }
    }

    #[cfg(test)]
    pub(crate) fn session_start(&self) -> Option<f64> {
        self.session_start
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &dyn SettingsStore {
        &*self.store
    }
}

/// Elapsed whole seconds since `start`, clamped so a future timestamp (clock
/// rollback, corrupt value) never yields a negative display.
fn elapsed_since(start: Option<f64>, now: f64) -> u64 {
    match start {
        Some(start) => (now - start).max(0.0) as u64,
        None => 0,
    }
}

fn read_u64(store: &dyn SettingsStore, key: &str) -> Option<u64> {
    store.get_i64(key).map(|v| v.max(0) as u64)
}
