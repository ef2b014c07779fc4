use tracing::debug;

use crate::protocol::{FeatureCollection, tile_path};
use crate::request::{BoxFuture, FetchError, TileFetcher};

pub const DEFAULT_TILE_SERVER: &str = "http://localhost:48088";

/// Fetches tiles from `{base_url}/geo/{level}/{x}/{y}.json`.
///
/// Every call is a fresh request: no retry, no timeout, no caching.
#[derive(Debug, Clone)]
pub struct HttpTileFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTileFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn tile_url(&self, x: u32, y: u32, level: u32) -> String {
        format!("{}{}", self.base_url, tile_path(x, y, level))
    }
}

impl Default for HttpTileFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SERVER)
    }
}

impl TileFetcher for HttpTileFetcher {
    fn fetch_tile(
        &self,
        x: u32,
        y: u32,
        level: u32,
    ) -> BoxFuture<'_, Result<Option<FeatureCollection>, FetchError>> {
        let url = self.tile_url(x, y, level);
        Box::pin(async move {
            debug!("GET {url}");
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(Box::new(e)))?;

            if !resp.status().is_success() {
                return Err(FetchError::Status(resp.status().as_u16()));
            }

            let body = resp
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(Box::new(e)))?;

            serde_json::from_slice::<Option<FeatureCollection>>(&body).map_err(FetchError::Decode)
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::HttpTileFetcher;
    use crate::request::{FetchError, TileFetcher};

    /// Serves one canned HTTP response per connection and returns its base url.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request: Vec<u8> = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn builds_tile_urls() {
        let fetcher = HttpTileFetcher::new("http://example.test:8080/");
        assert_eq!(
            fetcher.tile_url(12, 3, 5),
            "http://example.test:8080/geo/5/12/3.json"
        );
        assert_eq!(
            HttpTileFetcher::default().tile_url(0, 0, 0),
            "http://localhost:48088/geo/0/0/0.json"
        );
    }

    #[tokio::test]
    async fn decodes_features() {
        let base = serve(
            "200 OK",
            r#"{"features":[{"id":2950159,"name":"Berlin","population":3426354,"elevation":74,"position":[13.41,52.52]}]}"#,
        )
        .await;
        let tile = HttpTileFetcher::new(base)
            .fetch_tile(2, 0, 1)
            .await
            .expect("fetch")
            .expect("features");
        assert_eq!(tile.features.len(), 1);
        assert_eq!(tile.features[0].id, "2950159");
        assert_eq!(tile.features[0].name, "Berlin");
    }

    #[tokio::test]
    async fn null_body_is_no_data() {
        let base = serve("200 OK", "null").await;
        let tile = HttpTileFetcher::new(base).fetch_tile(0, 0, 0).await.expect("fetch");
        assert_eq!(tile, None);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let base = serve("404 Not Found", "{}").await;
        let err = HttpTileFetcher::new(base).fetch_tile(0, 0, 0).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let base = serve("200 OK", "<html>").await;
        let err = HttpTileFetcher::new(base).fetch_tile(0, 0, 0).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {err}");
    }
}
