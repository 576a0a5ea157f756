//! Logger initialisation for the command-line entry point

use log::LevelFilter;

/// Map the number of `-v` flags to a log level
pub const fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the `env_logger` backend
///
/// `RUST_LOG` takes precedence over `level`. Repeated calls are ignored so
/// tests may initialise logging freely.
pub fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    // A logger may already be installed by an earlier call
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_target(false)
        .try_init();
}
