// packages/engine/src/playback/label.rs
//! Seek-control labels

use serde::{Deserialize, Serialize};

/// How the seek control describes the current position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// `time mm:ss.s`
    #[default]
    Elapsed,
    /// `event N`
    EventIndex,
}

/// Format milliseconds as `mm:ss.s`, rounded to the tenth of a second
pub fn format_elapsed(ms: f64) -> String {
    let tenths = (ms.max(0.0) / 100.0).round() as u64;
    let minutes = tenths / 600;
    let rest = tenths % 600;
    format!("{:02}:{:02}.{}", minutes, rest / 10, rest % 10)
}

pub fn format_label(mode: LabelMode, time_ms: f64, applied_count: usize) -> String {
    match mode {
        LabelMode::Elapsed => format!("time {}", format_elapsed(time_ms)),
        LabelMode::EventIndex => format!("event {}", applied_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "00:00.0");
        assert_eq!(format_elapsed(1234.0), "00:01.2");
        assert_eq!(format_elapsed(61_250.0), "01:01.3");
        assert_eq!(format_elapsed(59_960.0), "01:00.0");
        assert_eq!(format_elapsed(-5.0), "00:00.0");
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(LabelMode::Elapsed, 12_340.0, 3), "time 00:12.3");
        assert_eq!(format_label(LabelMode::EventIndex, 12_340.0, 3), "event 3");
    }
}
