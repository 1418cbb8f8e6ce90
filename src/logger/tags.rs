/// Log tags identify the subsystem a message comes from.
///
/// Debug output is enabled per tag (`--debug probe`), keyed by
/// `to_debug_key()`.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Images,
    Probe,
    Sweep,
}

impl LogTag {
    /// Lowercase key used by `--debug <key>` and `--only <key>`
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Images => "images".to_string(),
            LogTag::Probe => "probe".to_string(),
            LogTag::Sweep => "sweep".to_string(),
        }
    }

    /// Uncoloured label used when colours are stripped
    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
