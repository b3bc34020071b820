//! Background cache worker: offline precaching, request interception and
//! push notification display.

mod cache;
mod fetch;
mod lifecycle;
mod notification;

use http::{Method, StatusCode, Uri};

pub use cache::MemoryCacheStorage;
pub use notification::{ClickOutcome, NotificationClick, NotificationContent, DISMISS_ACTION};

pub const CACHE_NAME: &str = concat!("site-cache-v", env!("CARGO_PKG_VERSION"));
pub const OFFLINE_URL: &str = "/offline.html";
pub const PRECACHE_URLS: [&str; 5] = [
    "/",
    OFFLINE_URL,
    "/manifest.json",
    "/icons/icon-192x192.png",
    "/icons/badge-72x72.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin response with readable headers and body.
    Basic,
    Cors,
    Opaque,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResponse {
    pub status: StatusCode,
    pub kind: ResponseType,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl WorkerResponse {
    pub fn new(status: StatusCode, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            kind: ResponseType::Basic,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    pub fn offline() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "text/plain", "Offline")
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    Cors,
    NoCors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    pub mode: RequestMode,
}

impl FetchRequest {
    pub fn get(url: impl ToString, mode: RequestMode) -> Self {
        Self {
            method: Method::GET,
            url: url.to_string(),
            mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the platform performs the request itself.
    Passthrough,
    Respond(WorkerResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// One worker instance bound to a site origin such as `https://site.test`.
pub struct CacheWorker<C, F, H> {
    origin: String,
    storage: C,
    fetcher: F,
    host: H,
}

impl<C, F, H> CacheWorker<C, F, H> {
    pub fn new(origin: &str, storage: C, fetcher: F, host: H) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            storage,
            fetcher,
            host,
        }
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    fn is_same_origin(&self, url: &str) -> bool {
        match url.parse::<Uri>() {
            Ok(uri) => match (uri.scheme_str(), uri.authority()) {
                (Some(scheme), Some(authority)) => {
                    format!("{}://{}", scheme, authority) == self.origin
                }
                _ => false,
            },
            Err(_) => false,
        }
    }
}

/// Path component of an absolute or origin-relative URL, `/` when absent.
pub(crate) fn url_path(url: &str) -> String {
    url.parse::<Uri>()
        .ok()
        .map(|uri| uri.path().to_string())
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| "/".to_string())
}
