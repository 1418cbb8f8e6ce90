//! Structured, tagged console logging
//!
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via `--debug <tag>` flags
//! - Tag whitelist via `--only <tag>` flags
//! - Colored, aligned console output
//!
//! ## Usage
//!
//! ```rust
//! use game_image_resolver::logger::{self, LogTag};
//!
//! logger::warning(LogTag::Probe, "Probe timed out");
//! logger::info(LogTag::Sweep, "Sweeper started");
//! logger::debug(LogTag::Images, "Cache hit"); // Only with --debug images
//! logger::verbose(LogTag::Probe, "Joined in-flight probe"); // Only with --verbose
//! ```

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_flags, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from command-line flags
///
/// Call once at startup, before any service starts logging.
pub fn init(verbose: bool, debug_tags: &[String], only_tags: &[String]) {
    config::init_from_flags(verbose, debug_tags, only_tags);
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown when `--debug <tag>` names this tag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
