//! Seams between the client components and the environment they run in.
//!
//! A browser host implements these over the real worker, push and
//! notification facilities; tests implement them with in-memory fakes.

use std::future::Future;

use types::PushSubscriptionJson;

use crate::{
    worker::{FetchRequest, NotificationContent, WindowClient, WorkerResponse},
    ClientError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    pub service_worker: bool,
    pub push_manager: bool,
    pub notifications: bool,
}

impl PlatformCapabilities {
    pub fn full() -> Self {
        Self {
            service_worker: true,
            push_manager: true,
            notifications: true,
        }
    }

    pub fn supports_push(&self) -> bool {
        self.service_worker && self.push_manager && self.notifications
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    pub script_url: String,
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

/// Page-side access to worker registration and the push manager.
pub trait PushPlatform {
    fn capabilities(&self) -> PlatformCapabilities;

    fn request_permission(&self) -> impl Future<Output = PermissionState>;

    /// Returns the existing registration when one is already in place for
    /// the same script and scope.
    fn register_worker(
        &self,
        script_url: &str,
        scope: &str,
    ) -> impl Future<Output = Result<WorkerRegistration, ClientError>>;

    fn worker_ready(&self) -> impl Future<Output = Result<(), ClientError>>;

    /// Never prompts the user.
    fn get_subscription(
        &self,
    ) -> impl Future<Output = Result<Option<PushSubscriptionJson>, ClientError>>;

    fn subscribe(
        &self,
        options: SubscribeOptions,
    ) -> impl Future<Output = Result<PushSubscriptionJson, ClientError>>;

    /// Cancels the active subscription on this device. `Ok(false)` when
    /// there was nothing to cancel.
    fn unsubscribe(&self) -> impl Future<Output = Result<bool, ClientError>>;
}

/// The server endpoints the subscription manager talks to.
pub trait PushServerApi {
    fn public_key(&self) -> impl Future<Output = Result<String, ClientError>>;

    fn save_subscription(
        &self,
        subscription: &PushSubscriptionJson,
    ) -> impl Future<Output = Result<(), ClientError>>;

    fn delete_subscription(&self, endpoint: &str) -> impl Future<Output = Result<(), ClientError>>;
}

/// Named response caches, as exposed to the background worker.
pub trait CacheStorage {
    fn keys(&self) -> impl Future<Output = Result<Vec<String>, ClientError>>;

    fn delete(&self, cache_name: &str) -> impl Future<Output = Result<bool, ClientError>>;

    fn match_url(
        &self,
        cache_name: &str,
        url: &str,
    ) -> impl Future<Output = Result<Option<WorkerResponse>, ClientError>>;

    fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: WorkerResponse,
    ) -> impl Future<Output = Result<(), ClientError>>;
}

/// Network access from inside the worker.
pub trait Fetcher {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<WorkerResponse, ClientError>>;
}

/// Worker-global facilities: lifecycle control, window clients and the
/// notification tray.
pub trait WorkerHost {
    fn skip_waiting(&self) -> impl Future<Output = Result<(), ClientError>>;

    fn claim_clients(&self) -> impl Future<Output = Result<(), ClientError>>;

    /// Includes windows the worker does not control yet.
    fn match_all_windows(&self) -> impl Future<Output = Result<Vec<WindowClient>, ClientError>>;

    fn focus(&self, client_id: &str) -> impl Future<Output = Result<(), ClientError>>;

    fn open_window(&self, url: &str) -> impl Future<Output = Result<(), ClientError>>;

    fn show_notification(
        &self,
        content: &NotificationContent,
    ) -> impl Future<Output = Result<(), ClientError>>;

    fn close_notification(&self, notification_id: &str)
        -> impl Future<Output = Result<(), ClientError>>;
}
