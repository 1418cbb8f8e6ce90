/// Deterministic placeholder URLs derived from a text label
///
/// `https://<host>/seed/<seed>/<width>/<height>` where the seed is the label
/// lowercased, every run outside `[a-z0-9]` collapsed to `-`, URL-encoded.
use crate::config::ImagesConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;

static NON_ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("static regex"));

/// Seed used when a label normalizes to nothing
const EMPTY_SEED: &str = "game";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTemplate {
    host: String,
    width: u32,
    height: u32,
}

impl FallbackTemplate {
    pub fn new(host: &str, width: u32, height: u32) -> Self {
        Self {
            host: host.trim().trim_end_matches('/').to_string(),
            width,
            height,
        }
    }

    pub fn from_config(config: &ImagesConfig) -> Self {
        Self::new(
            &config.fallback_host,
            config.fallback_width,
            config.fallback_height,
        )
    }

    /// Placeholder URL for `label`; a pure function of the label
    pub fn url_for(&self, label: &str) -> String {
        format!(
            "https://{}/seed/{}/{}/{}",
            self.host,
            seed_for(label),
            self.width,
            self.height
        )
    }

    /// Whether `url` was produced by this template
    pub fn matches(&self, url: &str) -> bool {
        let prefix = format!("https://{}/seed/", self.host);
        let suffix = format!("/{}/{}", self.width, self.height);
        match url.strip_prefix(&prefix).and_then(|rest| rest.strip_suffix(&suffix)) {
            Some(seed) => !seed.is_empty() && !seed.contains('/'),
            None => false,
        }
    }
}

/// Normalize and encode a label into a URL path segment
pub fn seed_for(label: &str) -> String {
    let lowered = label.to_lowercase();
    let normalized = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "-");
    if normalized.is_empty() {
        return EMPTY_SEED.to_string();
    }
    form_urlencoded::byte_serialize(normalized.as_bytes()).collect()
}
