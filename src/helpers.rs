/// Waits until either Ctrl-C (SIGINT) or SIGTERM is received.
pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv()             => {},
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Split a batch line of the form `url<TAB>label`
///
/// A line without a tab is a URL with an empty label. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_batch_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return None;
    }

    match line.split_once('\t') {
        Some((url, label)) => Some((url.trim().to_string(), label.trim().to_string())),
        None => Some((line.trim().to_string(), String::new())),
    }
}
