// Author: Dustin Pilgrim
// License: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Seconds since the last user input event.
///
/// `None` means the sensor cannot answer right now (no backend, backend not
/// ready, lock poisoned); the timer keeps its previous idle value in that
/// case. Implementations must not block: the read happens on the tick path.
pub trait IdleSensor {
    fn current_idle_seconds(&self) -> Option<f64>;
}

/// Shared clock written by the Wayland monitor and read by the ticker.
///
/// The compositor tells us *transitions* (idled after a fixed timeout,
/// resumed on input), not a continuous count, so the count is reconstructed:
/// while idled, idle = notification timeout + time since the idled event;
/// while active, idle is below the timeout and reported as zero.
#[derive(Debug, Default)]
struct IdleClock {
    idled_at: Option<Instant>,
}

#[derive(Clone)]
pub struct SharedIdleState {
    clock: Arc<Mutex<IdleClock>>,
    ready: Arc<AtomicBool>,
    timeout_secs: f64,
}

impl SharedIdleState {
    pub fn new(timeout_secs: f64) -> Self {
        Self {
            clock: Arc::new(Mutex::new(IdleClock::default())),
            ready: Arc::new(AtomicBool::new(false)),
            timeout_secs,
        }
    }

    /// Called by the monitor once the idle-notify protocol is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }

    pub fn set_idled(&self) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.idled_at = Some(Instant::now());
        }
    }

    pub fn set_resumed(&self) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.idled_at = None;
        }
    }
}

impl IdleSensor for SharedIdleState {
    fn current_idle_seconds(&self) -> Option<f64> {
        if !self.ready.load(Ordering::Relaxed) {
            return None;
        }

        let clock = self.clock.lock().ok()?;
        Some(match clock.idled_at {
            Some(at) => self.timeout_secs + at.elapsed().as_secs_f64(),
            None => 0.0,
        })
    }
}

#[cfg(test)]
pub mod scripted {
    use super::IdleSensor;
    use std::sync::Mutex;

    /// Test sensor that replays a fixed sequence of readings.
    pub struct ScriptedSensor {
        readings: Mutex<Vec<Option<f64>>>,
    }

    impl ScriptedSensor {
        pub fn new(mut readings: Vec<Option<f64>>) -> Self {
            readings.reverse();
            Self {
                readings: Mutex::new(readings),
            }
        }
    }

    impl IdleSensor for ScriptedSensor {
        fn current_idle_seconds(&self) -> Option<f64> {
            self.readings.lock().unwrap().pop().flatten()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedSensor;
    use super::*;

    #[test]
    fn unready_sensor_reports_unknown() {
        let state = SharedIdleState::new(1.0);
        assert_eq!(state.current_idle_seconds(), None);
    }

    #[test]
    fn ready_sensor_reports_zero_while_active() {
        let state = SharedIdleState::new(1.0);
        state.mark_ready();
        assert_eq!(state.current_idle_seconds(), Some(0.0));
    }

    #[test]
    fn idled_sensor_counts_from_the_notification_timeout() {
        let state = SharedIdleState::new(1.0);
        state.mark_ready();
        state.set_idled();

        let idle = state.current_idle_seconds().unwrap();
        assert!(idle >= 1.0);

        state.set_resumed();
        assert_eq!(state.current_idle_seconds(), Some(0.0));
    }

    #[test]
    fn scripted_sensor_replays_in_order() {
        let sensor = ScriptedSensor::new(vec![Some(0.0), None, Some(301.0)]);
        assert_eq!(sensor.current_idle_seconds(), Some(0.0));
        assert_eq!(sensor.current_idle_seconds(), None);
        assert_eq!(sensor.current_idle_seconds(), Some(301.0));
    }
}
