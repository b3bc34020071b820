use tracing::{event, Level};
use types::PushSubscriptionJson;

use crate::{
    key_codec::decode_application_key,
    platform::{PermissionState, PushPlatform, PushServerApi, SubscribeOptions},
    ClientError,
};

pub const WORKER_SCRIPT_URL: &str = "/sw.js";
pub const WORKER_SCOPE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Worker, push or notification capability is missing. Terminal.
    Unsupported,
    /// Capable, but permission is undecided or was denied.
    Default,
    Subscribed,
    Unsubscribed,
}

/// Drives the page-side push subscription lifecycle and keeps the device and
/// the server in agreement.
///
/// Every failed step leaves a human-readable message in [`error`](Self::error)
/// before returning; a successful transition clears it.
pub struct SubscriptionManager<P, A> {
    platform: P,
    api: A,
    state: SubscriptionState,
    subscription: Option<PushSubscriptionJson>,
    error: Option<String>,
}

impl<P: PushPlatform, A: PushServerApi> SubscriptionManager<P, A> {
    pub fn new(platform: P, api: A) -> Self {
        let state = if platform.capabilities().supports_push() {
            SubscriptionState::Default
        } else {
            SubscriptionState::Unsupported
        };
        Self {
            platform,
            api,
            state,
            subscription: None,
            error: None,
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn subscription(&self) -> Option<&PushSubscriptionJson> {
        self.subscription.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[tracing::instrument(name = "Enabling push notifications", skip(self))]
    pub async fn enable(&mut self) -> Result<(), ClientError> {
        self.ensure_supported()?;

        if self.platform.request_permission().await != PermissionState::Granted {
            self.state = SubscriptionState::Default;
            return Err(self.fail(ClientError::PermissionDenied));
        }

        match self.subscribe().await {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.state = SubscriptionState::Subscribed;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn subscribe(&self) -> Result<PushSubscriptionJson, ClientError> {
        self.platform
            .register_worker(WORKER_SCRIPT_URL, WORKER_SCOPE)
            .await?;
        self.platform.worker_ready().await?;

        let public_key = self.api.public_key().await?;
        let subscription = self
            .platform
            .subscribe(SubscribeOptions {
                user_visible_only: true,
                application_server_key: decode_application_key(&public_key)?,
            })
            .await?;

        if let Err(e) = self.api.save_subscription(&subscription).await {
            if let Err(cancel_error) = self.platform.unsubscribe().await {
                event!(
                    Level::WARN,
                    %cancel_error,
                    "Could not cancel local subscription after save failed"
                );
            }
            return Err(e);
        }
        Ok(subscription)
    }

    /// Local cancellation is authoritative: the state moves to
    /// `Unsubscribed` even when the server could not be told, in which case
    /// the error slot carries a notice and `Ok` is still returned.
    #[tracing::instrument(name = "Disabling push notifications", skip(self))]
    pub async fn disable(&mut self) -> Result<(), ClientError> {
        self.ensure_supported()?;

        let subscription = match self.platform.get_subscription().await {
            Ok(subscription) => subscription,
            Err(e) => return Err(self.fail(e)),
        };
        self.error = None;

        if let Some(subscription) = subscription {
            if let Err(e) = self.platform.unsubscribe().await {
                return Err(self.fail(e));
            }
            self.state = SubscriptionState::Unsubscribed;
            self.subscription = None;

            if let Err(e) = self.api.delete_subscription(&subscription.endpoint).await {
                event!(Level::WARN, error = %e, "Server did not acknowledge unsubscribe");
                self.error = Some(format!(
                    "Unsubscribed on this device, but the server could not be updated. {}",
                    e
                ));
            }
        } else {
            self.state = SubscriptionState::Unsubscribed;
            self.subscription = None;
        }
        Ok(())
    }

    pub async fn check_existing(&mut self) -> Result<SubscriptionState, ClientError> {
        self.ensure_supported()?;

        match self.platform.get_subscription().await {
            Ok(subscription) => {
                self.state = match subscription {
                    Some(_) => SubscriptionState::Subscribed,
                    None => SubscriptionState::Unsubscribed,
                };
                self.subscription = subscription;
                self.error = None;
                Ok(self.state)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn ensure_supported(&mut self) -> Result<(), ClientError> {
        match self.state {
            SubscriptionState::Unsupported => Err(self.fail(ClientError::UnsupportedEnvironment)),
            _ => Ok(()),
        }
    }

    fn fail(&mut self, e: ClientError) -> ClientError {
        event!(Level::DEBUG, error = %e, "Push subscription step failed");
        self.error = Some(e.to_string());
        e
    }
}
