// packages/engine/src/recording/mod.rs
//! Session event model and storage
//!
//! - **Event**: timestamped, typed session events and their wire format
//! - **Event Log**: immutable, time-ordered storage with a filter policy
//! - **Loader**: reads captured logs from JSON files
//!
//! # Data Flow
//!
//! ```text
//! Capture (external) → append() → EventLog (read-only)
//!                                      ↓
//!                                ReplayEngine cursor
//! ```

pub mod event;
pub mod event_log;
pub mod loader;

// Re-export commonly used types
pub use event::{
    Event, EventKind, EventType, FramebufferUpdate, KeyEvent, PointerSkinUpdate, PointerUpdate,
};
pub use event_log::{EventLog, FilterPolicy, TimelineBound, DEFAULT_SLACK_MS};
pub use loader::{load_log, parse_log};
