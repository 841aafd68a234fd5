//! Process-wide logging setup shared by every binary.

/// Tracing subscriber configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, UnknownLogFormat};

/// Initialise logging with `default_level` as the filter when `RUST_LOG` is
/// unset.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(format: LogFormat, default_level: &str) {
    tracing::init(format, default_level);
}
