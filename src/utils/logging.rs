use tracing_subscriber::{EnvFilter, fmt};

use crate::utils::consts::{LOG_LEVEL, VERBOSE_LOG_LEVEL};

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_LOG_LEVEL } else { LOG_LEVEL };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    // stdout carries JSON output, so logs go to stderr
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}
