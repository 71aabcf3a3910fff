// packages/engine/src/playback/clock.rs
//! Playback clock
//!
//! Advances the replay engine from frame callbacks while playing. The host
//! scheduler calls [`PlaybackClock::on_frame`] once per frame; wall time
//! comes from an injectable [`FrameTimer`] so tests can drive it by hand.
//! Cancellation is cooperative: a frame that arrives after `pause` sees
//! `playing == false` and does nothing.

use crate::observability::metrics as names;
use crate::replay::engine::ReplayEngine;
use crate::replay::sink::PresentationSink;
use crate::utils::errors::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Source of wall-clock time for frame callbacks
pub trait FrameTimer {
    /// Monotonic wall time in milliseconds
    fn now_ms(&mut self) -> f64;
}

/// Wall time from tokio's clock (follows `tokio::time::pause` in tests)
#[derive(Debug, Clone, Copy)]
pub struct SystemTimer {
    origin: tokio::time::Instant,
}

impl SystemTimer {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer for SystemTimer {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven timer; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    bits: Arc<AtomicU64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, ms: f64) {
        self.set(self.get() + ms);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

impl FrameTimer for ManualTimer {
    fn now_ms(&mut self) -> f64 {
        self.get()
    }
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Not playing; nothing was done
    Idle,
    /// Seeked to the given time; schedule another frame
    Advanced(f64),
    /// Reached the end of the timeline and paused
    Ended,
}

/// Drives continuous playback of a [`ReplayEngine`]
#[derive(Debug, Clone)]
pub struct PlaybackClock<T: FrameTimer> {
    timer: T,
    last_frame_ms: f64,
}

impl<T: FrameTimer> PlaybackClock<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            last_frame_ms: 0.0,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Start playing from the current position
    ///
    /// At the end of the timeline playback restarts from baseline.
    pub fn play<S: PresentationSink>(&mut self, engine: &mut ReplayEngine<S>) {
        if engine.current_time() >= engine.end_time() {
            info!("Restarting playback from the beginning");
            engine.reset();
        }

        engine.set_playing(true);
        self.last_frame_ms = self.timer.now_ms();
        info!(
            "Playing from {}ms at {}x",
            engine.current_time(),
            engine.speed()
        );
    }

    pub fn pause<S: PresentationSink>(&mut self, engine: &mut ReplayEngine<S>) {
        if engine.is_playing() {
            info!("Paused at {}ms", engine.current_time());
        }
        engine.set_playing(false);
    }

    pub fn toggle<S: PresentationSink>(&mut self, engine: &mut ReplayEngine<S>) {
        if engine.is_playing() {
            self.pause(engine);
        } else {
            self.play(engine);
        }
    }

    /// Change the speed multiplier; elapsed time is not rescaled retroactively
    pub fn set_speed<S: PresentationSink>(
        &mut self,
        engine: &mut ReplayEngine<S>,
        speed: f64,
    ) -> Result<()> {
        engine.set_speed(speed)?;
        debug!("Playback speed set to {}x", speed);
        Ok(())
    }

    /// One frame callback
    pub fn on_frame<S: PresentationSink>(&mut self, engine: &mut ReplayEngine<S>) -> FrameOutcome {
        if !engine.is_playing() {
            return FrameOutcome::Idle;
        }

        let now = self.timer.now_ms();
        let elapsed = (now - self.last_frame_ms).max(0.0);
        self.last_frame_ms = now;

        let proposed = engine.current_time() + elapsed * engine.speed();
        if proposed > engine.end_time() {
            engine.seek(engine.end_time());
            self.pause(engine);
            metrics::counter!(names::PLAYBACK_ENDED_TOTAL).increment(1);
            info!("Reached end of recording at {}ms", engine.end_time());
            return FrameOutcome::Ended;
        }

        engine.seek(proposed);
        FrameOutcome::Advanced(proposed)
    }
}
