// Author: Dustin Pilgrim
// License: MIT

/// Timeline events driving the state machine. Wall-clock time is carried in
/// the event so handling stays deterministic and testable.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick {
        now: f64,
        /// Idle sensor reading in seconds; `None` when the sensor could not
        /// answer (the timer keeps its previous value).
        idle: Option<f64>,
    },
}

/// User commands. All of these are total: the timer clamps or no-ops instead
/// of rejecting, so a command never produces an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    FastForward { seconds: i64 },
    SetThresholds { yellow: u64, red: u64 },
    SetIdleReset { seconds: u64 },
    SimulateIdle { on: bool },
}
