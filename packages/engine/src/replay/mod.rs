// packages/engine/src/replay/mod.rs
//! Seekable replay
//!
//! - **Engine**: cursor over the event log; forward deltas, rewind by reset
//! - **Handlers**: per-event-type effect application
//! - **Sink**: presentation commands and non-fatal diagnostics
//! - **Images**: lookup of captured screen and pointer images
//!
//! # Seek Flow
//!
//! ```text
//! seek(T) → clamp → count_before(T) → reset? → apply_event() × delta
//!                                                   ↓
//!                                       Command → PresentationSink
//! ```

pub mod engine;
pub mod handlers;
pub mod images;
pub mod sink;

// Re-export commonly used types
pub use engine::{EngineOptions, EnginePhase, PlaybackState, ReplayEngine, SeekOutcome};
pub use images::{AnyImage, ImageProvider};
pub use sink::{Command, Diagnostic, PresentationSink, RecordingSink};
