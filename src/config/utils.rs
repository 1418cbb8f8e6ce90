use super::schemas::Config;
/// Configuration utilities - loading from disk
///
/// The loaded `Config` is returned to the caller and handed to the
/// components that need it; nothing is stored globally.
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use std::path::{Path, PathBuf};

/// Default configuration file path, relative to the working directory
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_PATH)
}

/// Load configuration from a specific file path
///
/// A missing file yields the defaults. An unreadable, malformed or invalid
/// file is an error.
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    logger::info(
        LogTag::Config,
        &format!("Loaded configuration from '{}'", path.display()),
    );
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[images]\nprobe_timeout_ms = 2500\ntrusted_hosts = [\"cdn.example.org\"]"
        )
        .unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.images.probe_timeout_ms, 2500);
        assert_eq!(config.images.trusted_hosts, vec!["cdn.example.org".to_string()]);
        assert_eq!(config.images.retention_window_ms, 1_800_000);
        assert_eq!(config.probe, Default::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[images\nprobe_timeout_ms = ").unwrap();

        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[images]\nsweep_interval_ms = 0").unwrap();

        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
