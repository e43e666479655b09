//! Stderr logging for scaffold runs.
//!
//! Validation diagnostics surface as `warn`/`error` events and each run is
//! wrapped in a `scaffold` span whose close event reports how long parsing,
//! generation and writing took. Everything goes to stderr: with `--stdout`
//! or `--diagnostics json` the standard output carries the artifacts or the
//! diagnostics array and must stay free of log lines.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::ScaffoldConfig;

fn filter_from_config(config: &ScaffoldConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Install the stderr subscriber at the level resolved in `config`, where
/// `--log-level` has already overridden `GHERKIN_SCAFFOLD_LOG_LEVEL`.
///
/// When configuration itself is invalid `main` falls back to the default
/// config so the error can still be logged. Only the first call installs a
/// subscriber; later calls are no-ops.
pub fn init_logging(config: &ScaffoldConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
