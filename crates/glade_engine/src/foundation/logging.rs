//! Logging utilities
//!
//! Thin shim over `env_logger` so binaries have a single place to call.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}
