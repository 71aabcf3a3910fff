// packages/engine/src/playback/mod.rs
//! Continuous playback
//!
//! - **Clock**: turns frame callbacks and wall time into seeks
//! - **Driver**: tokio loop that schedules frames and serves user controls
//! - **Label**: text shown next to the seek control

pub mod clock;
pub mod driver;
pub mod label;

pub use clock::{FrameOutcome, FrameTimer, ManualTimer, PlaybackClock, SystemTimer};
pub use driver::{Control, DriverExit, PlaybackDriver, RunMode};
pub use label::{format_elapsed, format_label, LabelMode};
