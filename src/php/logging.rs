use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::php::error::{PhpfmtError, Result};

static LOGGING_INIT: Once = Once::new();

/// Installs the global tracing subscriber, writing to stderr so formatted output on stdout
/// stays clean. `RUST_LOG` selects the level; the default is `warn`.
///
/// Repeated calls are treated as no-ops once initialization succeeds.
pub fn init_logging() -> Result<()> {
    let mut init_result = Ok(());

    LOGGING_INIT.call_once(|| {
        init_result = tracing_subscriber::fmt()
            .with_env_filter(default_env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| PhpfmtError::Logging(error.to_string()));
    });

    init_result
}

fn default_env_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn"),
    }
}
