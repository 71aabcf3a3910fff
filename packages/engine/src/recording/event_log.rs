// packages/engine/src/recording/event_log.rs
//! Append-built, time-ordered event log
//!
//! The log is filled once by the capture side and is read-only afterwards.
//! Events are trusted to arrive in non-decreasing time order; nothing here
//! re-sorts or validates them.

use crate::recording::event::{Event, EventKind, EventType};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Slack added after the last event so the seek control can reach it (ms)
pub const DEFAULT_SLACK_MS: f64 = 250.0;

/// Decides which event types are stored for replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Store every event
    #[default]
    KeepAll,

    /// Drop continuous input samples (pointer motion, raw key up/down);
    /// the screen-only viewer never replays them
    DropInputs,

    /// Drop exactly the listed types
    Exclude(Vec<EventType>),
}

impl FilterPolicy {
    /// Whether an event of this kind is kept in the log
    pub fn retains(&self, kind: &EventKind) -> bool {
        let Some(event_type) = kind.event_type() else {
            // unknown types are stored so replay can report them
            return true;
        };

        match self {
            FilterPolicy::KeepAll => true,
            FilterPolicy::DropInputs => !matches!(
                event_type,
                EventType::PointerUpdate | EventType::KeyPress | EventType::KeyRelease
            ),
            FilterPolicy::Exclude(types) => !types.contains(&event_type),
        }
    }
}

/// Seekable range of a finished log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineBound {
    /// Largest event time observed, including filtered events
    pub max_event_ms: f64,

    /// Upper bound for seeking: `floor(max_event_ms + slack)`, or 0 for an empty log
    pub end_ms: f64,
}

impl TimelineBound {
    pub fn new(max_event_ms: f64, slack_ms: f64, observed_any: bool) -> Self {
        let end_ms = if observed_any {
            (max_event_ms + slack_ms).floor()
        } else {
            0.0
        };
        Self {
            max_event_ms,
            end_ms,
        }
    }

    /// Clamp a requested time into `[0, end_ms]`
    pub fn clamp(&self, time: f64) -> f64 {
        if time.is_nan() {
            return 0.0;
        }
        time.clamp(0.0, self.end_ms)
    }
}

/// Ordered storage of session events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    policy: FilterPolicy,
    tmax: f64,
    observed: usize,
}

impl EventLog {
    /// Create an empty log with the given filter policy
    pub fn new(policy: FilterPolicy) -> Self {
        Self {
            events: Vec::new(),
            policy,
            tmax: 0.0,
            observed: 0,
        }
    }

    /// Build a log from events already in capture order
    pub fn from_events(events: impl IntoIterator<Item = Event>, policy: FilterPolicy) -> Self {
        let mut log = Self::new(policy);
        for event in events {
            log.append(event);
        }
        log
    }

    /// Append an event in capture order
    ///
    /// `tmax` is tracked for every event, stored or not. Returns whether the
    /// event was kept by the filter policy.
    pub fn append(&mut self, event: Event) -> bool {
        self.observed += 1;
        if event.time > self.tmax {
            self.tmax = event.time;
        }

        if self.policy.retains(&event.kind) {
            self.events.push(event);
            true
        } else {
            trace!("Filtered {} event at {}ms", event.kind.type_name(), event.time);
            false
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Largest event time seen so far
    pub fn tmax(&self) -> f64 {
        self.tmax
    }

    /// Number of events appended, including filtered ones
    pub fn observed_count(&self) -> usize {
        self.observed
    }

    /// Number of events dropped by the filter policy
    pub fn filtered_count(&self) -> usize {
        self.observed - self.events.len()
    }

    /// Number of stored events strictly before `time`
    ///
    /// An event stamped exactly at `time` is not counted.
    pub fn count_before(&self, time: f64) -> usize {
        self.events.partition_point(|e| e.time < time)
    }

    /// Seekable range with the given slack
    pub fn bound(&self, slack_ms: f64) -> TimelineBound {
        TimelineBound::new(self.tmax, slack_ms, self.observed > 0)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
