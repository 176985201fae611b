//! Tracing subscriber setup.
//!
//! Internal steps are logged with `tracing` and stay silent unless
//! `RUST_LOG` or `--verbose` asks for them. User-facing diagnostics go
//! through [`crate::output`] instead.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` with
/// `verbose` and `warn` without. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default = if verbose { "vipconf=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
