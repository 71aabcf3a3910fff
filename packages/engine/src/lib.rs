// packages/engine/src/lib.rs
//! Victrola Replay Engine Library
//!
//! Seekable replay of recorded remote-desktop sessions. A captured event log
//! (screen updates, pointer movement, pointer glyph changes, key presses) is
//! turned back into presentation commands for any point on the timeline.
//!
//! # Architecture
//!
//! - **recording**: event model, event log and JSON loading
//! - **replay**: seekable engine, event handlers, presentation sink
//! - **effects**: pointer, click ripples, keyboard indicators, keystroke log
//! - **playback**: frame clock, tokio driver, seek labels
//! - **observability**: tracing and metrics
//! - **utils**: configuration and errors

pub mod effects;
pub mod observability;
pub mod playback;
pub mod recording;
pub mod replay;
pub mod utils;

// Re-export commonly used types
pub use playback::{Control, PlaybackClock, PlaybackDriver};
pub use recording::{Event, EventKind, EventLog, FilterPolicy};
pub use replay::{Command, Diagnostic, PresentationSink, ReplayEngine};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
