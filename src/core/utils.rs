// Author: Dustin Pilgrim
// License: MIT

/// Wall-clock time as fractional seconds since the unix epoch.
pub fn now_secs() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs_f64()
}

/// Compact elapsed-time rendering used by the tooltip and status text:
/// minutes under an hour, otherwise hours with a minute remainder.
pub fn format_compact(secs: u64) -> String {
    if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h{}m", hours, minutes)
        }
    }
}
