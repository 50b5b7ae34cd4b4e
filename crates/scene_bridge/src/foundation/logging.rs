//! Logging utilities and structured logging support
//!
//! The library only emits through the `log` facade. Binaries pick the backend.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a fallback level when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_filter(default_level: log::LevelFilter) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
