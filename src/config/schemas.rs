/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro, so a config file
/// only needs the fields it overrides.
use crate::config_struct;
use crate::errors::ConfigError;
use std::time::Duration;

// ============================================================================
// IMAGE CACHE
// ============================================================================

config_struct! {
    /// Image resolution cache configuration
    pub struct ImagesConfig {
        /// Age after which an entry is stale (30 minutes)
        retention_window_ms: u64 = 1_800_000,
        /// A probe with no outcome after this long counts as failed
        probe_timeout_ms: u64 = 5_000,
        /// Period of the background sweep (5 minutes)
        sweep_interval_ms: u64 = 300_000,
        /// Hosts whose images are probed instead of replaced by a placeholder
        trusted_hosts: Vec<String> = vec![
            "images.unsplash.com".to_string(),
            "picsum.photos".to_string(),
            "i.imgur.com".to_string(),
            "cdn.pixabay.com".to_string(),
        ],
        /// Placeholder image service host
        fallback_host: String = "picsum.photos".to_string(),
        fallback_width: u32 = 400,
        fallback_height: u32 = 300,
    }
}

impl ImagesConfig {
    pub fn retention_window(&self) -> Duration {
        Duration::from_millis(self.retention_window_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

// ============================================================================
// HTTP PROBE
// ============================================================================

config_struct! {
    /// HTTP image probe configuration
    pub struct ProbeConfig {
        user_agent: String = concat!("game-image-resolver/", env!("CARGO_PKG_VERSION")).to_string(),
        max_redirects: usize = 5,
        /// Route probes through the proxy named by HTTP(S)_PROXY
        use_system_proxy: bool = true,
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Root configuration, one section per subsystem
    pub struct Config {
        images: ImagesConfig = ImagesConfig::default(),
        probe: ProbeConfig = ProbeConfig::default(),
    }
}

impl Config {
    /// Reject values the resolver cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let images = &self.images;
        let durations = [
            ("images.retention_window_ms", images.retention_window_ms),
            ("images.probe_timeout_ms", images.probe_timeout_ms),
            ("images.sweep_interval_ms", images.sweep_interval_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0", name)));
            }
        }

        if images.fallback_width == 0 || images.fallback_height == 0 {
            return Err(ConfigError::Invalid(
                "images.fallback_width and images.fallback_height must be > 0".to_string(),
            ));
        }

        if images.fallback_host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "images.fallback_host must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = Config::default();
        assert_eq!(config.images.retention_window(), Duration::from_secs(30 * 60));
        assert_eq!(config.images.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.images.sweep_interval(), Duration::from_secs(5 * 60));
        assert!(config
            .images
            .trusted_hosts
            .contains(&"images.unsplash.com".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.images.probe_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("images.probe_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_blank_fallback_host() {
        let mut config = Config::default();
        config.images.fallback_host = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
