// packages/engine/src/utils/mod.rs
//! Shared utilities
//!
//! - **Errors**: crate-wide error type and `Result` alias
//! - **Config**: layered engine configuration (defaults, file, environment)

pub mod config;
pub mod errors;

pub use config::EngineConfig;
pub use errors::{EngineError, Result};
