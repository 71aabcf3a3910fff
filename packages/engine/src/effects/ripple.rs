// packages/engine/src/effects/ripple.rs
//! Click ripples
//!
//! Every primary-button press leaves a [`ClickMarker`]. A marker is drawn as
//! an expanding ring while `current_time - marker.time` lies in
//! `[0, duration)`; the ring's radius grows linearly and its stroke follows
//! `max_width * t * (1 - t)`. Markers outside the window are skipped rather
//! than removed, so moving the clock back over them makes them visible again.

use serde::{Deserialize, Serialize};

/// Default ripple lifetime (ms)
pub const RIPPLE_DURATION_MS: f64 = 800.0;

/// Ripple geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleConfig {
    pub duration_ms: f64,
    pub radius: f64,
    pub max_width: f64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            duration_ms: RIPPLE_DURATION_MS,
            radius: 24.0,
            max_width: 8.0,
        }
    }
}

/// A past click
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClickMarker {
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

/// One ring to draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RippleFrame {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub stroke_width: f64,

    /// Normalized age in `[0, 1)`
    pub progress: f64,
}

/// Click markers accumulated during replay
#[derive(Debug, Clone, Default)]
pub struct RippleTrail {
    config: RippleConfig,
    markers: Vec<ClickMarker>,
}

impl RippleTrail {
    pub fn new(config: RippleConfig) -> Self {
        Self {
            config,
            markers: Vec::new(),
        }
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[ClickMarker] {
        &self.markers
    }

    /// Record a click and drop markers that can no longer become visible
    ///
    /// `marker.time` is the time of the event being applied. Without a reset
    /// the clock never returns to or before that time, so anything that
    /// expired by then stays expired.
    pub fn register(&mut self, marker: ClickMarker) {
        let horizon = marker.time;
        let duration = self.config.duration_ms;
        self.markers.retain(|m| m.time + duration > horizon);
        self.markers.push(marker);
    }

    /// Normalized age of a marker, or `None` outside its window
    pub fn progress(&self, marker: &ClickMarker, current_time: f64) -> Option<f64> {
        let t = (current_time - marker.time) / self.config.duration_ms;
        (0.0..1.0).contains(&t).then_some(t)
    }

    /// Rings visible at `current_time`, oldest first
    pub fn render(&self, current_time: f64) -> Vec<RippleFrame> {
        self.markers
            .iter()
            .filter_map(|marker| {
                let t = self.progress(marker, current_time)?;
                Some(RippleFrame {
                    x: marker.x,
                    y: marker.y,
                    radius: self.config.radius * t,
                    stroke_width: self.config.max_width * t * (1.0 - t),
                    progress: t,
                })
            })
            .collect()
    }
}
