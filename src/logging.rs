//! Diagnostic logging setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directives.
pub const CONFR_LOG_ENV: &str = "CONFR_LOG";

/// Initialize a tracing subscriber writing to stderr.
///
/// The filter comes from `CONFR_LOG` (for example `confr=debug`), defaulting
/// to `warn`. Stdout stays reserved for command output and prompts.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_env(CONFR_LOG_ENV).or_else(|_| EnvFilter::try_new("warn"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
