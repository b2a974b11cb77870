//! Logging utilities built on the `log` facade

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_filter("info");
}

/// Initialize the logging system, falling back to `default_filter` when
/// `RUST_LOG` is not set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
