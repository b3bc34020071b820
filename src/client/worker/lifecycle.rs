use tracing::{event, Level};

use crate::{
    platform::{CacheStorage, Fetcher, WorkerHost},
    ClientError,
};

use super::{CacheWorker, FetchRequest, RequestMode, CACHE_NAME, PRECACHE_URLS};

impl<C: CacheStorage, F: Fetcher, H: WorkerHost> CacheWorker<C, F, H> {
    /// Precaches the offline shell. Every asset is fetched before anything is
    /// written, so a failed install leaves no partial cache behind and the
    /// previous worker stays in charge.
    #[tracing::instrument(name = "Installing cache worker", skip(self))]
    pub async fn install(&self) -> Result<(), ClientError> {
        let mut fetched = Vec::with_capacity(PRECACHE_URLS.len());
        for path in PRECACHE_URLS {
            let url = self.absolute_url(path);
            let response = self
                .fetcher
                .fetch(&FetchRequest::get(&url, RequestMode::SameOrigin))
                .await
                .map_err(|e| ClientError::Worker(format!("precache {} failed: {}", path, e)))?;
            if !response.is_ok() {
                return Err(ClientError::Worker(format!(
                    "precache {} failed: status {}",
                    path, response.status
                )));
            }
            fetched.push((url, response));
        }

        // A reinstall of the same version must not drop the cache the active
        // worker still serves from.
        let cache_existed = self.storage.keys().await?.iter().any(|name| name == CACHE_NAME);
        for (url, response) in fetched {
            if let Err(e) = self.storage.put(CACHE_NAME, &url, response).await {
                if !cache_existed {
                    if let Err(rollback_error) = self.storage.delete(CACHE_NAME).await {
                        event!(
                            Level::WARN,
                            cache = CACHE_NAME,
                            error = %rollback_error,
                            "Could not remove partially written cache"
                        );
                    }
                }
                return Err(e);
            }
        }
        event!(Level::INFO, cache = CACHE_NAME, "Precached offline shell");

        self.host.skip_waiting().await
    }

    /// Drops every cache left by earlier versions and takes control of open
    /// pages. Returns the names of the deleted caches.
    #[tracing::instrument(name = "Activating cache worker", skip(self))]
    pub async fn activate(&self) -> Result<Vec<String>, ClientError> {
        let mut deleted = vec![];
        for cache_name in self.storage.keys().await? {
            if cache_name != CACHE_NAME && self.storage.delete(&cache_name).await? {
                event!(Level::INFO, cache = %cache_name, "Deleted stale cache");
                deleted.push(cache_name);
            }
        }

        self.host.claim_clients().await?;
        Ok(deleted)
    }
}
