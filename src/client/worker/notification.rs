use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{event, Level};
use types::{NotificationAction, PushData, PushPayload};

use crate::{
    platform::{CacheStorage, Fetcher, WorkerHost},
    ClientError,
};

use super::{url_path, CacheWorker};

pub const DISMISS_ACTION: &str = "dismiss";

const DEFAULT_TITLE: &str = "Notification";
const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
const DEFAULT_BADGE: &str = "/icons/badge-72x72.png";
const DEFAULT_URL: &str = "/";
const DEFAULT_VIBRATE: [u32; 3] = [100, 50, 100];

/// A push payload with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: PushData,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

impl Default for NotificationContent {
    fn default() -> Self {
        PushPayload::default().into()
    }
}

impl From<PushPayload> for NotificationContent {
    fn from(payload: PushPayload) -> Self {
        let mut data = payload.data.unwrap_or_default();
        data.url.get_or_insert_with(|| DEFAULT_URL.to_string());
        Self {
            title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: payload.body.unwrap_or_default(),
            icon: payload.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            badge: payload.badge.unwrap_or_else(|| DEFAULT_BADGE.to_string()),
            data,
            vibrate: payload.vibrate.unwrap_or_else(|| DEFAULT_VIBRATE.to_vec()),
            actions: payload.actions.unwrap_or_default(),
        }
    }
}

impl NotificationContent {
    /// Payloads that are not a JSON object are shown as the body text.
    /// Inside an object each field is resolved on its own, so a malformed
    /// field falls back to its default without dropping the others.
    pub fn from_payload(payload: Option<&[u8]>) -> Self {
        let Some(bytes) = payload else {
            return Self::default();
        };
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(fields)) => resolve_fields(&fields).into(),
            _ => PushPayload {
                body: Some(String::from_utf8_lossy(bytes).into_owned()),
                ..Default::default()
            }
            .into(),
        }
    }

    pub fn target_url(&self) -> &str {
        self.data.url.as_deref().unwrap_or(DEFAULT_URL)
    }
}

fn resolve_fields(fields: &Map<String, Value>) -> PushPayload {
    PushPayload {
        title: field(fields, "title"),
        body: field(fields, "body"),
        icon: field(fields, "icon"),
        badge: field(fields, "badge"),
        data: resolve_data(fields.get("data")),
        vibrate: field(fields, "vibrate"),
        actions: fields.get("actions").and_then(Value::as_array).map(|actions| {
            actions
                .iter()
                .filter_map(|action| serde_json::from_value(action.clone()).ok())
                .collect()
        }),
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    fields
        .get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

// Only `url` is interpreted; the rest of the bag is carried as-is.
fn resolve_data(data: Option<&Value>) -> Option<PushData> {
    let data = data?.as_object()?;
    Some(PushData {
        url: data.get("url").and_then(Value::as_str).map(str::to_string),
        extra: data
            .iter()
            .filter(|(key, _)| key.as_str() != "url")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationClick {
    pub notification_id: String,
    pub content: NotificationContent,
    /// Id of the action button pressed, `None` for the notification body.
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Dismissed,
    Focused(String),
    Opened(String),
}

impl<C: CacheStorage, F: Fetcher, H: WorkerHost> CacheWorker<C, F, H> {
    pub async fn push(&self, payload: Option<&[u8]>) -> Result<NotificationContent, ClientError> {
        let content = NotificationContent::from_payload(payload);
        self.host.show_notification(&content).await?;
        Ok(content)
    }

    /// Brings the admin to the page the notification points at, reusing an
    /// open window on the same path when there is one.
    #[tracing::instrument(name = "Routing notification click", skip(self, click))]
    pub async fn notification_click(
        &self,
        click: &NotificationClick,
    ) -> Result<ClickOutcome, ClientError> {
        self.host.close_notification(&click.notification_id).await?;
        if click.action.as_deref() == Some(DISMISS_ACTION) {
            return Ok(ClickOutcome::Dismissed);
        }

        let target = click.content.target_url();
        let target_path = url_path(target);
        let windows = self.host.match_all_windows().await?;
        if let Some(window) = windows.iter().find(|w| url_path(&w.url) == target_path) {
            self.host.focus(&window.id).await?;
            return Ok(ClickOutcome::Focused(window.id.clone()));
        }

        event!(Level::DEBUG, url = %target, "No open window on target, opening one");
        self.host.open_window(target).await?;
        Ok(ClickOutcome::Opened(target.to_string()))
    }
}
