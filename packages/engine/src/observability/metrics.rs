// packages/engine/src/observability/metrics.rs
//! Metric names

use metrics::{describe_counter, Unit};

pub const EVENTS_APPLIED_TOTAL: &str = "victrola_events_applied_total";
pub const EVENTS_SKIPPED_TOTAL: &str = "victrola_events_skipped_total";
pub const RESETS_TOTAL: &str = "victrola_resets_total";
pub const REWINDS_TOTAL: &str = "victrola_rewinds_total";
pub const PLAYBACK_ENDED_TOTAL: &str = "victrola_playback_ended_total";

/// Register descriptions with the installed recorder
pub fn describe_metrics() {
    describe_counter!(
        EVENTS_APPLIED_TOTAL,
        Unit::Count,
        "Events folded into the replay snapshot"
    );
    describe_counter!(
        EVENTS_SKIPPED_TOTAL,
        Unit::Count,
        "Events skipped because of a missing image or unknown type"
    );
    describe_counter!(RESETS_TOTAL, Unit::Count, "Resets to baseline");
    describe_counter!(
        REWINDS_TOTAL,
        Unit::Count,
        "Backward seeks that replayed from baseline"
    );
    describe_counter!(
        PLAYBACK_ENDED_TOTAL,
        Unit::Count,
        "Playback runs that reached the end of the timeline"
    );
}
