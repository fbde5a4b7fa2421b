//! Tracing subscriber setup for hosts that don't install their own.
//!
//! Configure via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug`: everything at debug and above
//! - `RUST_LOG=dashgrid.drop=trace`: zone generation for drop resolution
//! - `RUST_LOG=dashgrid.fit=warn,dashgrid.editor=debug`: scoped filtering
//!
//! Without `RUST_LOG`, only warnings are printed.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global fmt subscriber filtered by `RUST_LOG` (fallback `warn`).
///
/// Returns `false` when a global subscriber was already set; the existing
/// one is left in place, so calling this more than once is harmless.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
}
