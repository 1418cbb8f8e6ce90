/// Source trust check for candidate image URLs
use std::collections::HashSet;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    hosts: HashSet<String>,
}

impl TrustPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// An absolute http(s) URL whose host is exactly an allow-listed host
    pub fn is_trusted(&self, candidate: &str) -> bool {
        let url = match Url::parse(candidate) {
            Ok(url) => url,
            Err(_) => return false,
        };

        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        // Url lowercases domain hosts while parsing
        url.host_str()
            .map(|host| self.hosts.contains(host))
            .unwrap_or(false)
    }
}
