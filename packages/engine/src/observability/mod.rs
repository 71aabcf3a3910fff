// packages/engine/src/observability/mod.rs
//! Logging and metrics
//!
//! - **Tracing**: `tracing-subscriber` with an `EnvFilter` (`RUST_LOG`)
//! - **Metrics**: counters through the `metrics` facade; the host decides
//!   whether a recorder is installed

pub mod metrics;

use crate::utils::errors::{EngineError, Result};
use tracing_subscriber::EnvFilter;

pub use self::metrics::describe_metrics;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| EngineError::ObservabilityFailed(e.to_string()))
}
