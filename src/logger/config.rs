/// Logger configuration shared by every log call
///
/// Set once by the binary from its command-line flags; tests may replace it
/// with `set_logger_config`.
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Highest level that may be printed
    pub min_level: LogLevel,
    /// Tags with debug output enabled (debug keys)
    pub debug_tags: HashSet<String>,
    /// Whitelist of tags; empty means all tags
    pub enabled_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn update_logger_config<F>(f: F)
where
    F: FnOnce(&mut LoggerConfig),
{
    let mut config = LOGGER_CONFIG.write();
    f(&mut config);
}

/// Build the logger configuration from CLI flags
///
/// Any `--debug` tag raises the threshold to Debug; `--verbose` raises it to
/// Verbose for every tag. `--only` tags restrict output to those tags.
pub fn init_from_flags(verbose: bool, debug_tags: &[String], only_tags: &[String]) {
    update_logger_config(|config| {
        config.debug_tags = debug_tags.iter().map(|t| t.to_lowercase()).collect();
        config.enabled_tags = only_tags.iter().map(|t| t.to_lowercase()).collect();
        config.min_level = if verbose {
            LogLevel::Verbose
        } else if !config.debug_tags.is_empty() {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };
    });
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = LOGGER_CONFIG.read();
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(&tag.to_debug_key())
}
