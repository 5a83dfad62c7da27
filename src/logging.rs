//! Logging setup for the embedded repository server and its harness.
//!
//! Wraps `env_logger` so binaries and tests initialize logging the same
//! way. The default filter is `info`; override with `RUST_LOG`.

/// Initialize the global logger.
///
/// Safe to call more than once; only the first call wins, so callers
/// typically ignore the result with `logging::init().ok()`.
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
}
