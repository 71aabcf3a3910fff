// packages/engine/src/playback/driver.rs
//! Tokio frame loop
//!
//! Plays the role of the host scheduler: an interval produces frame
//! callbacks while the engine is playing, and user controls arrive on a
//! channel. Both are handled in one `select!` loop, so every handler runs to
//! completion before the next one starts and the last call wins.

use crate::playback::clock::{FrameOutcome, FrameTimer, PlaybackClock};
use crate::replay::engine::ReplayEngine;
use crate::replay::sink::PresentationSink;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// User-initiated playback control
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Seek to a time in milliseconds
    Seek(f64),
    /// Seek to an event index
    SeekIndex(usize),
    Play,
    Pause,
    Toggle,
    SetSpeed(f64),
    /// Leave the loop
    Stop,
}

/// When the driver loop returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Return as soon as playback reaches the end of the timeline
    UntilEnd,
    /// Keep serving controls after the end; return on `Stop` or disconnect
    Interactive,
}

/// Why the driver loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    Ended,
    Stopped,
    /// Control channel closed while paused
    Disconnected,
}

/// Runs a [`PlaybackClock`] on tokio time
pub struct PlaybackDriver<T: FrameTimer> {
    clock: PlaybackClock<T>,
    frame_interval: Duration,
}

impl<T: FrameTimer> PlaybackDriver<T> {
    pub fn new(clock: PlaybackClock<T>, frame_interval: Duration) -> Self {
        Self {
            clock,
            frame_interval,
        }
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock<T> {
        &mut self.clock
    }

    /// Apply one control to the engine
    pub fn apply_control<S: PresentationSink>(
        &mut self,
        engine: &mut ReplayEngine<S>,
        control: Control,
    ) {
        debug!(?control, "control");
        match control {
            Control::Seek(time) => {
                engine.seek(time);
            }
            Control::SeekIndex(index) => {
                engine.seek_to_index(index);
            }
            Control::Play => self.clock.play(engine),
            Control::Pause => self.clock.pause(engine),
            Control::Toggle => self.clock.toggle(engine),
            Control::SetSpeed(speed) => {
                if let Err(e) = self.clock.set_speed(engine, speed) {
                    warn!("Ignoring speed change: {}", e);
                }
            }
            Control::Stop => self.clock.pause(engine),
        }
    }

    /// Serve frames and controls until the run mode says to stop
    pub async fn run<S: PresentationSink>(
        &mut self,
        engine: &mut ReplayEngine<S>,
        mut controls: mpsc::Receiver<Control>,
        mode: RunMode,
    ) -> DriverExit {
        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut controls_open = true;

        loop {
            if !controls_open && !engine.is_playing() {
                return DriverExit::Disconnected;
            }

            tokio::select! {
                _ = interval.tick(), if engine.is_playing() => {
                    if self.clock.on_frame(engine) == FrameOutcome::Ended
                        && mode == RunMode::UntilEnd
                    {
                        return DriverExit::Ended;
                    }
                }
                control = controls.recv(), if controls_open => match control {
                    Some(Control::Stop) => {
                        self.apply_control(engine, Control::Stop);
                        return DriverExit::Stopped;
                    }
                    Some(control) => self.apply_control(engine, control),
                    None => {
                        debug!("Control channel closed");
                        controls_open = false;
                    }
                },
                else => return DriverExit::Disconnected,
            }
        }
    }
}
