// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{
    timer::{Phase, SittingTimer},
    utils::format_compact,
};

/// Fully-settled view of the timer, taken after a mutation has been applied
/// and persisted. Consumers (status bar, `perch status`) only ever see one of
/// these, never the timer mid-transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub displayed_elapsed: u64,
    pub idle_seconds: u64,
    pub yellow_threshold: u64,
    pub red_threshold: u64,
    pub idle_reset_seconds: u64,
    pub simulate_idle: bool,
    pub tooltip: String,
}

/// Status-bar JSON contract (Waybar-style).
#[derive(Debug, Clone, Serialize)]
pub struct BarInfo {
    pub text: String,
    pub alt: String,
    pub class: String,
    pub tooltip: String,
}

impl StatusSnapshot {
    pub fn of(timer: &SittingTimer) -> Self {
        let thresholds = timer.thresholds();
        Self {
            phase: timer.phase(),
            displayed_elapsed: timer.displayed_elapsed(),
            idle_seconds: timer.idle_seconds(),
            yellow_threshold: thresholds.yellow,
            red_threshold: thresholds.red,
            idle_reset_seconds: timer.idle_reset_seconds(),
            simulate_idle: timer.simulate_idle(),
            tooltip: timer.tooltip(),
        }
    }

    /// Color bucket for the elapsed display. Phases that are not counting up
    /// get their own class so bars can style them distinctly.
    pub fn class(&self) -> &'static str {
        match self.phase {
            Phase::Paused => "paused",
            Phase::Idle => "idle",
            Phase::Running => {
                if self.displayed_elapsed >= self.red_threshold {
                    "red"
                } else if self.displayed_elapsed >= self.yellow_threshold {
                    "yellow"
                } else {
                    "green"
                }
            }
        }
    }

    pub fn bar_info(&self) -> BarInfo {
        BarInfo {
            text: format_compact(self.displayed_elapsed),
            alt: self.phase.as_str().to_string(),
            class: self.class().to_string(),
            tooltip: self.tooltip.clone(),
        }
    }

    /// Multi-line human text for `perch status`.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("State:       {}\n", self.phase.as_str()));
        out.push_str(&format!(
            "Elapsed:     {} ({}s)\n",
            format_compact(self.displayed_elapsed),
            self.displayed_elapsed
        ));
        out.push_str(&format!("Idle:        {}s\n", self.idle_seconds));
        out.push_str(&format!(
            "Zones:       yellow at {}, red at {}\n",
            format_compact(self.yellow_threshold),
            format_compact(self.red_threshold)
        ));
        out.push_str(&format!(
            "Idle reset:  {}\n",
            format_compact(self.idle_reset_seconds)
        ));
        if self.simulate_idle {
            out.push_str("Debug:       simulate-idle is ON\n");
        }
        out
    }
}
