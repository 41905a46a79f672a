//! Process-wide tracing/logging setup shared by the binaries.

/// Subscriber configuration (filters, layers).
pub mod tracing;

pub use self::tracing::DEFAULT_FILTER;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init();
}
