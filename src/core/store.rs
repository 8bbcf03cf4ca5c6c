// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;

/// Persisted settings keys.
///
/// The store is a flat key-value bag of scalars; these are the only keys the
/// timer ever touches.
pub mod keys {
    pub const YELLOW_THRESHOLD: &str = "yellowThreshold";
    pub const RED_THRESHOLD: &str = "redThreshold";
    pub const IDLE_RESET_SECONDS: &str = "idleResetSeconds";
    pub const STATE: &str = "state";
    pub const SESSION_START: &str = "sessionStart";
    pub const PAUSED_ELAPSED: &str = "pausedElapsed";
}

/// Scalar key-value storage for timer state.
///
/// Writes are fire-and-forget from the timer's point of view: a backend that
/// can fail must log and keep the in-memory value, never surface an error.
/// Missing or malformed values read as `None` and the caller substitutes a
/// default.
pub trait SettingsStore: Send {
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn get_f64(&self, key: &str) -> Option<f64>;
    fn get_str(&self, key: &str) -> Option<String>;

    fn set_i64(&mut self, key: &str, value: i64);
    fn set_f64(&mut self, key: &str, value: f64);
    fn set_str(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);
}

/// In-memory store backing the timer tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(|v| v.as_i64())
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(|v| v.as_f64())
    }

    fn get_str(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value.into());
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value.into());
    }

    fn set_str(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.into());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}
