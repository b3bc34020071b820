use http::{Method, StatusCode};
use tracing::{event, Level};

use crate::platform::{CacheStorage, Fetcher, WorkerHost};

use super::{
    CacheWorker, FetchOutcome, FetchRequest, RequestMode, ResponseType, WorkerResponse,
    CACHE_NAME, OFFLINE_URL,
};

impl<C: CacheStorage, F: Fetcher, H: WorkerHost> CacheWorker<C, F, H> {
    /// Intercepts a page request. Never fails: the worst case is a
    /// synthesized offline response.
    pub async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        if request.method != Method::GET || !self.is_same_origin(&request.url) {
            return FetchOutcome::Passthrough;
        }

        let response = match request.mode {
            RequestMode::Navigate => self.network_first(request).await,
            _ => self.cache_first(request).await,
        };
        FetchOutcome::Respond(response)
    }

    async fn network_first(&self, request: &FetchRequest) -> WorkerResponse {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store(&request.url, &response).await;
                }
                response
            }
            Err(e) => {
                event!(Level::DEBUG, url = %request.url, error = %e, "Navigation offline");
                self.offline_fallback(&request.url).await
            }
        }
    }

    async fn offline_fallback(&self, url: &str) -> WorkerResponse {
        let candidates = [
            url.to_string(),
            self.absolute_url("/"),
            self.absolute_url(OFFLINE_URL),
        ];
        for candidate in candidates {
            if let Ok(Some(cached)) = self.storage.match_url(CACHE_NAME, &candidate).await {
                return cached;
            }
        }
        WorkerResponse::offline()
    }

    async fn cache_first(&self, request: &FetchRequest) -> WorkerResponse {
        match self.storage.match_url(CACHE_NAME, &request.url).await {
            Ok(Some(cached)) => return cached,
            Ok(None) => {}
            Err(e) => {
                event!(Level::WARN, url = %request.url, error = %e, "Cache lookup failed");
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == StatusCode::OK && response.kind == ResponseType::Basic {
                    self.store(&request.url, &response).await;
                }
                response
            }
            Err(e) => {
                event!(Level::DEBUG, url = %request.url, error = %e, "Asset fetch failed");
                WorkerResponse::offline()
            }
        }
    }

    async fn store(&self, url: &str, response: &WorkerResponse) {
        if let Err(e) = self.storage.put(CACHE_NAME, url, response.clone()).await {
            event!(Level::WARN, url = %url, error = %e, "Could not write response to cache");
        }
    }
}
