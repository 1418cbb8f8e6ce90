/// Image-loading primitive used to probe a URL
///
/// `HttpImageLoader` is the production implementation; tests substitute
/// their own `ImageLoader`.
use crate::config::ProbeConfig;
use crate::errors::ProbeError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Ok when the URL serves a loadable image
    async fn load(&self, url: &str) -> Result<(), ProbeError>;
}

/// Probes over HTTP: a 2xx response with an `image/*` content type loads
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if !is_image_content_type(content_type.as_deref()) {
            return Err(ProbeError::NotAnImage {
                url: url.to_string(),
                content_type,
            });
        }

        Ok(())
    }
}

fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port, return its base URL
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn local_loader() -> HttpImageLoader {
        let config = ProbeConfig {
            use_system_proxy: false,
            ..ProbeConfig::default()
        };
        HttpImageLoader::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_load_accepts_image_response() {
        let base = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4\r\nConnection: close\r\n\r\n\x89PNG",
        )
        .await;

        let result = local_loader().load(&format!("{}/cover.png", base)).await;
        assert!(result.is_ok(), "unexpected error: {:?}", result);
    }

    #[tokio::test]
    async fn test_load_rejects_error_status() {
        let base = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = local_loader()
            .load(&format!("{}/missing.png", base))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ProbeError::HttpStatus { status: 404, .. }),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_load_rejects_non_image_body() {
        let base = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 6\r\nConnection: close\r\n\r\n<html>",
        )
        .await;

        let err = local_loader()
            .load(&format!("{}/page", base))
            .await
            .unwrap_err();
        match err {
            ProbeError::NotAnImage { content_type, .. } => {
                assert_eq!(content_type.as_deref(), Some("text/html"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_reports_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_loader()
            .load(&format!("http://{}/cover.png", addr))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ProbeError::Transport { .. }),
            "unexpected error: {:?}",
            err
        );
    }

    #[test]
    fn test_image_content_types() {
        assert!(is_image_content_type(Some("image/jpeg")));
        assert!(is_image_content_type(Some("Image/WebP; charset=binary")));
        assert!(!is_image_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_image_content_type(None));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(HttpImageLoader::new(&ProbeConfig::default()).is_ok());
    }
}
