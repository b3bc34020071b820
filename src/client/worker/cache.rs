use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use crate::{platform::CacheStorage, ClientError};

use super::WorkerResponse;

/// Process-local cache storage for hosts without a persistent one.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<BTreeMap<String, HashMap<String, WorkerResponse>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_caches<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, HashMap<String, WorkerResponse>>) -> T,
    ) -> Result<T, ClientError> {
        let mut caches = self
            .caches
            .lock()
            .map_err(|e| ClientError::Worker(format!("cache storage poisoned: {}", e)))?;
        Ok(f(&mut caches))
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn keys(&self) -> Result<Vec<String>, ClientError> {
        self.with_caches(|caches| caches.keys().cloned().collect())
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, ClientError> {
        self.with_caches(|caches| caches.remove(cache_name).is_some())
    }

    async fn match_url(
        &self,
        cache_name: &str,
        url: &str,
    ) -> Result<Option<WorkerResponse>, ClientError> {
        self.with_caches(|caches| {
            caches
                .get(cache_name)
                .and_then(|cache| cache.get(url))
                .cloned()
        })
    }

    async fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: WorkerResponse,
    ) -> Result<(), ClientError> {
        self.with_caches(|caches| {
            caches
                .entry(cache_name.to_string())
                .or_default()
                .insert(url.to_string(), response);
        })
    }
}

impl<T: CacheStorage> CacheStorage for &T {
    async fn keys(&self) -> Result<Vec<String>, ClientError> {
        (**self).keys().await
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, ClientError> {
        (**self).delete(cache_name).await
    }

    async fn match_url(
        &self,
        cache_name: &str,
        url: &str,
    ) -> Result<Option<WorkerResponse>, ClientError> {
        (**self).match_url(cache_name, url).await
    }

    async fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: WorkerResponse,
    ) -> Result<(), ClientError> {
        (**self).put(cache_name, url, response).await
    }
}
