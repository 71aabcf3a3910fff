// packages/engine/src/recording/loader.rs
//! Load event logs from JSON files
//!
//! Accepts a JSON array of events in either wire shape (objects or
//! `[type, time, payload]` triples).

use crate::recording::event::Event;
use crate::recording::event_log::{EventLog, FilterPolicy};
use crate::utils::errors::{EngineError, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Parse a JSON event array into a log
pub fn parse_log(json: &str, policy: FilterPolicy) -> Result<EventLog> {
    let events: Vec<Event> = serde_json::from_str(json)
        .map_err(|e| EngineError::LogLoadFailed(format!("Invalid event JSON: {}", e)))?;

    debug!("Parsed {} events", events.len());

    Ok(EventLog::from_events(events, policy))
}

/// Read and parse an event log file
pub async fn load_log(path: &Path, policy: FilterPolicy) -> Result<EventLog> {
    let json = fs::read_to_string(path).await.map_err(|e| {
        EngineError::LogLoadFailed(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let log = parse_log(&json, policy)?;

    info!(
        "Loaded {} events from {:?} ({} filtered, tmax {}ms)",
        log.len(),
        path,
        log.filtered_count(),
        log.tmax()
    );

    Ok(log)
}
