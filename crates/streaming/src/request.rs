use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use parking_lot::Mutex;

use crate::protocol::FeatureCollection;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The body was not a valid feature collection.
    Decode(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(err) => write!(f, "tile request failed: {err}"),
            FetchError::Status(status) => write!(f, "tile endpoint returned HTTP {status}"),
            FetchError::Decode(err) => write!(f, "invalid tile payload: {err}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(err) => Some(err.as_ref()),
            FetchError::Status(_) => None,
            FetchError::Decode(err) => Some(err),
        }
    }
}

/// Retrieves the point features of one tile.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Returns `Ok(None)` when the endpoint answers with an empty body.
pub trait TileFetcher: Send + Sync {
    fn fetch_tile(
        &self,
        x: u32,
        y: u32,
        level: u32,
    ) -> BoxFuture<'_, Result<Option<FeatureCollection>, FetchError>>;
}

/// Canned answer of a `MemoryTileFetcher`.
#[derive(Debug, Clone)]
pub enum MemoryResponse {
    Features(FeatureCollection),
    Empty,
    Fail(String),
}

/// In-memory fetcher for tests and offline demos.
///
/// Tiles without a canned response answer with an empty collection. Every
/// call is recorded as `(level, x, y)`.
#[derive(Debug, Default)]
pub struct MemoryTileFetcher {
    responses: Mutex<HashMap<(u32, u32, u32), MemoryResponse>>,
    requests: Mutex<Vec<(u32, u32, u32)>>,
}

impl MemoryTileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, level: u32, x: u32, y: u32, response: MemoryResponse) {
        self.responses.lock().insert((level, x, y), response);
    }

    pub fn set_features(&self, level: u32, x: u32, y: u32, features: FeatureCollection) {
        self.set_response(level, x, y, MemoryResponse::Features(features));
    }

    pub fn requests(&self) -> Vec<(u32, u32, u32)> {
        self.requests.lock().clone()
    }
}

impl TileFetcher for MemoryTileFetcher {
    fn fetch_tile(
        &self,
        x: u32,
        y: u32,
        level: u32,
    ) -> BoxFuture<'_, Result<Option<FeatureCollection>, FetchError>> {
        self.requests.lock().push((level, x, y));
        let response = self.responses.lock().get(&(level, x, y)).cloned();

        Box::pin(async move {
            match response {
                None => Ok(Some(FeatureCollection::default())),
                Some(MemoryResponse::Features(features)) => Ok(Some(features)),
                Some(MemoryResponse::Empty) => Ok(None),
                Some(MemoryResponse::Fail(reason)) => Err(FetchError::Transport(reason.into())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchError, MemoryResponse, MemoryTileFetcher, TileFetcher};
    use crate::protocol::FeatureCollection;

    #[tokio::test]
    async fn memory_fetcher_replays_canned_responses() {
        let fetcher = MemoryTileFetcher::new();
        fetcher.set_response(2, 1, 1, MemoryResponse::Empty);
        fetcher.set_response(2, 0, 1, MemoryResponse::Fail("connection refused".into()));

        let unknown = fetcher.fetch_tile(3, 3, 2).await.expect("unknown tile");
        assert_eq!(unknown, Some(FeatureCollection::default()));
        assert_eq!(fetcher.fetch_tile(1, 1, 2).await.expect("empty"), None);

        let err = fetcher.fetch_tile(0, 1, 2).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(err.to_string(), "tile request failed: connection refused");

        assert_eq!(fetcher.requests(), vec![(2, 3, 3), (2, 1, 1), (2, 0, 1)]);
    }
}
