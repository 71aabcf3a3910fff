// packages/engine/src/replay/engine.rs
//! Seekable replay engine
//!
//! Holds the playback cursor over a shared [`EventLog`] and turns "show the
//! session at time T" into forward event applications. Moving forward only
//! applies the missing delta. Anything that needs fewer events than are
//! already applied resets to baseline and replays from the first event,
//! because drawn frames and logged keystrokes cannot be taken back.

use crate::effects::keyboard::KeyboardLayout;
use crate::effects::ripple::{RippleConfig, RippleFrame};
use crate::effects::EffectTracker;
use crate::observability::metrics as names;
use crate::playback::label::{format_label, LabelMode};
use crate::recording::event_log::{EventLog, TimelineBound, DEFAULT_SLACK_MS};
use crate::replay::handlers::apply_event;
use crate::replay::images::ImageProvider;
use crate::replay::sink::{Command, PresentationSink};
use crate::utils::config::EngineConfig;
use crate::utils::errors::{EngineError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnginePhase {
    /// Nothing applied since the last reset
    Idle,
    /// A defined snapshot at the given time
    AtTime(f64),
}

/// Cursor and clock state, owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub applied_count: usize,
    pub playing: bool,
    pub speed: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            applied_count: 0,
            playing: false,
            speed: 1.0,
        }
    }
}

/// What a seek did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeekOutcome {
    /// Events applied by this call
    pub applied: usize,
    /// Whether the engine reset to baseline first
    pub rewound: bool,
}

/// Construction options
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub slack_ms: f64,
    pub ripple: RippleConfig,
    pub layout: KeyboardLayout,
    pub speed: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            slack_ms: DEFAULT_SLACK_MS,
            ripple: RippleConfig::default(),
            layout: KeyboardLayout::standard(),
            speed: 1.0,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            slack_ms: config.timeline.slack_ms,
            ripple: config.effects.ripple(),
            layout: KeyboardLayout::standard(),
            speed: config.playback.speed,
        }
    }
}

/// Replays an event log into a presentation sink
pub struct ReplayEngine<S: PresentationSink> {
    log: Arc<EventLog>,
    bound: TimelineBound,
    state: PlaybackState,
    phase: EnginePhase,
    effects: EffectTracker,
    images: Box<dyn ImageProvider + Send + Sync>,
    sink: S,
    scratch: Vec<Command>,
}

impl<S: PresentationSink> ReplayEngine<S> {
    /// Create an engine with default options
    pub fn new(
        log: Arc<EventLog>,
        sink: S,
        images: impl ImageProvider + Send + Sync + 'static,
    ) -> Self {
        Self::with_options(log, sink, images, EngineOptions::default())
    }

    pub fn with_options(
        log: Arc<EventLog>,
        sink: S,
        images: impl ImageProvider + Send + Sync + 'static,
        options: EngineOptions,
    ) -> Self {
        let bound = log.bound(options.slack_ms);
        debug!(
            "Replay engine over {} events, timeline end {}ms",
            log.len(),
            bound.end_ms
        );

        let speed = if options.speed.is_finite() && options.speed > 0.0 {
            options.speed
        } else {
            warn!("Ignoring invalid speed {}, using 1.0", options.speed);
            1.0
        };

        Self {
            log,
            bound,
            state: PlaybackState {
                speed,
                ..Default::default()
            },
            phase: EnginePhase::Idle,
            effects: EffectTracker::new(options.ripple, options.layout),
            images: Box::new(images),
            sink,
            scratch: Vec::new(),
        }
    }

    /// Discard the snapshot and return to baseline
    pub fn reset(&mut self) {
        debug!("Resetting replay to baseline");
        metrics::counter!(names::RESETS_TOTAL).increment(1);

        self.scratch.clear();
        self.scratch.push(Command::ClearToBaseline);
        self.effects.reset(&mut self.scratch);
        self.flush();

        self.state.applied_count = 0;
        self.state.current_time = 0.0;
        self.phase = EnginePhase::Idle;
    }

    /// Show the session as it was at `target_time` (milliseconds)
    ///
    /// The target is clamped to the timeline. Events stamped exactly at the
    /// target are not applied yet.
    pub fn seek(&mut self, target_time: f64) -> SeekOutcome {
        let target_time = self.bound.clamp(target_time);
        let target_index = self.log.count_before(target_time);

        let outcome = self.advance_to(target_index);
        self.state.current_time = target_time;
        self.phase = EnginePhase::AtTime(target_time);

        if outcome.applied > 0 || outcome.rewound {
            debug!(
                "Seek to {}ms: {} events applied (rewound: {}), cursor {}",
                target_time, outcome.applied, outcome.rewound, target_index
            );
        }
        outcome
    }

    /// Show the session right after `index` events have been applied
    ///
    /// Used by the index-slider viewer. The current time becomes the time of
    /// the first event not yet applied (or the timeline end), so the cursor
    /// still equals `count_before(current_time)`. Events sharing a timestamp
    /// are applied together: an index inside a tie group snaps to its end.
    pub fn seek_to_index(&mut self, index: usize) -> SeekOutcome {
        let time = self.bound.clamp(self.index_time(index));
        let target_index = self.log.count_before(time);

        let outcome = self.advance_to(target_index);
        self.state.current_time = time;
        self.phase = EnginePhase::AtTime(time);

        debug!(
            "Seek to event {}: cursor {} at {}ms",
            index, target_index, time
        );
        outcome
    }

    /// Earliest time at which the first `index` events are all applied
    fn index_time(&self, index: usize) -> f64 {
        let events = self.log.events();
        let index = index.min(events.len());
        if index == 0 {
            return 0.0;
        }

        let last_applied = events[index - 1].time;
        let next = events.partition_point(|e| e.time <= last_applied);
        events
            .get(next)
            .map(|e| e.time)
            .unwrap_or(self.bound.end_ms)
    }

    /// Apply the deep-link start time, given in seconds
    ///
    /// Only a positive time seeks; otherwise the engine stays at 0.
    pub fn seek_initial(&mut self, seconds: Option<f64>) -> Option<SeekOutcome> {
        match seconds {
            Some(s) if s.is_finite() && s > 0.0 => {
                info!("Starting at deep-linked time {:.2}s", s);
                Some(self.seek(s * 1000.0))
            }
            _ => None,
        }
    }

    fn advance_to(&mut self, target_index: usize) -> SeekOutcome {
        let mut outcome = SeekOutcome::default();

        if target_index < self.state.applied_count {
            self.reset();
            metrics::counter!(names::REWINDS_TOTAL).increment(1);
            outcome.rewound = true;
        }

        let start = self.state.applied_count;
        let log = Arc::clone(&self.log);
        for (index, event) in log.events()[start..target_index].iter().enumerate() {
            let index = start + index;
            self.scratch.clear();
            let diagnostic =
                apply_event(&mut self.effects, self.images.as_ref(), index, event, &mut self.scratch);
            self.flush();

            if let Some(diagnostic) = diagnostic {
                metrics::counter!(names::EVENTS_SKIPPED_TOTAL).increment(1);
                self.sink.report(diagnostic);
            }
        }

        outcome.applied = target_index - start;
        metrics::counter!(names::EVENTS_APPLIED_TOTAL).increment(outcome.applied as u64);
        self.state.applied_count = target_index;
        outcome
    }

    fn flush(&mut self) {
        for command in self.scratch.drain(..) {
            self.sink.execute(command);
        }
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn applied_count(&self) -> usize {
        self.state.applied_count
    }

    /// Upper end of the seekable range (last event time plus slack)
    pub fn end_time(&self) -> f64 {
        self.bound.end_ms
    }

    pub fn bound(&self) -> TimelineBound {
        self.bound
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.state.playing = playing;
    }

    /// Change the speed multiplier; takes effect on the next frame
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(EngineError::InvalidSpeed(speed));
        }
        self.state.speed = speed;
        Ok(())
    }

    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    pub fn effects(&self) -> &EffectTracker {
        &self.effects
    }

    /// Click ripples visible at the current time
    pub fn ripples(&self) -> Vec<RippleFrame> {
        self.effects.ripples().render(self.state.current_time)
    }

    pub fn keystrokes(&self) -> &str {
        self.effects.keystrokes().as_str()
    }

    /// Seek-control label for the current position
    pub fn label(&self, mode: LabelMode) -> String {
        format_label(mode, self.state.current_time, self.state.applied_count)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
