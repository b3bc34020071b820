//! Server-Sent Events transport for [`AdminSession`](crate::event_consumer::AdminSession).

use std::time::Duration;

use futures::StreamExt;
use http::{header::ACCEPT, StatusCode};
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::{event, Level};
use types::BroadcastEvent;

use crate::{
    event_consumer::{EventChannel, EventConnector},
    ClientError,
};

const DEFAULT_RETRY: Duration = Duration::from_secs(3);
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` parser. Chunks may split lines anywhere.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: String,
    data: Vec<String>,
    retry: Option<Duration>,
}

impl SseParser {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = vec![];
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(frame) = self.process_line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }
        frames
    }

    /// The most recent `retry:` value, if one arrived since the last call.
    pub fn take_retry(&mut self) -> Option<Duration> {
        self.retry.take()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            let event = std::mem::take(&mut self.event);
            let data = std::mem::take(&mut self.data);
            if data.is_empty() {
                return None;
            }
            return Some(SseFrame {
                event: if event.is_empty() {
                    "message".to_string()
                } else {
                    event
                },
                data: data.join("\n"),
            });
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = value.to_string(),
            "data" => self.data.push(value.to_string()),
            "retry" => {
                if let Ok(millis) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(millis));
                }
            }
            _ => {}
        }
        None
    }
}

/// Opens `GET <base_url>/admin/events` with a bearer token and keeps it
/// open, reconnecting after the server-advertised retry delay.
#[derive(Clone)]
pub struct SseConnector {
    client: reqwest::Client,
    url: String,
    bearer_token: String,
}

impl SseConnector {
    pub fn new(client: reqwest::Client, base_url: &str, bearer_token: &str) -> Self {
        Self {
            client,
            url: format!("{}/admin/events", base_url.trim_end_matches('/')),
            bearer_token: bearer_token.to_string(),
        }
    }
}

impl EventConnector for SseConnector {
    type Channel = SseEventSource;

    /// Must be called from within a tokio runtime.
    fn connect(&self) -> Result<SseEventSource, ClientError> {
        let handle = Handle::try_current().map_err(|e| ClientError::Worker(e.to_string()))?;
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let task = handle.spawn(run(self.clone(), sender));
        Ok(SseEventSource { receiver, task })
    }
}

pub struct SseEventSource {
    receiver: mpsc::Receiver<BroadcastEvent>,
    task: JoinHandle<()>,
}

impl EventChannel for SseEventSource {
    async fn next_event(&mut self) -> Option<BroadcastEvent> {
        self.receiver.recv().await
    }

    fn close(&mut self) {
        self.task.abort();
        self.receiver.close();
    }
}

impl Drop for SseEventSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(connector: SseConnector, sender: mpsc::Sender<BroadcastEvent>) {
    let mut retry = DEFAULT_RETRY;
    loop {
        let response = connector
            .client
            .get(&connector.url)
            .bearer_auth(&connector.bearer_token)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await;

        match response {
            Ok(res)
                if res.status() == StatusCode::UNAUTHORIZED
                    || res.status() == StatusCode::FORBIDDEN =>
            {
                event!(
                    Level::WARN,
                    status = %res.status(),
                    "Live updates refused, not reconnecting"
                );
                return;
            }
            Ok(res) if !res.status().is_success() => {
                event!(Level::WARN, status = %res.status(), "Live updates unavailable");
            }
            Ok(res) => {
                let mut parser = SseParser::default();
                let mut stream = res.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    let chunk = match chunk {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            event!(Level::DEBUG, error = %e, "Live update stream interrupted");
                            break;
                        }
                    };
                    let frames = parser.feed(&chunk);
                    if let Some(delay) = parser.take_retry() {
                        retry = delay;
                    }
                    for frame in frames {
                        match serde_json::from_str::<BroadcastEvent>(&frame.data) {
                            Ok(broadcast_event) => {
                                if sender.send(broadcast_event).await.is_err() {
                                    return;
                                }
                            }
                            Err(e) => event!(
                                Level::DEBUG,
                                frame_event = %frame.event,
                                error = %e,
                                "Skipped unreadable frame"
                            ),
                        }
                    }
                }
            }
            Err(e) => {
                event!(Level::DEBUG, error = %e, "Could not reach live updates");
            }
        }

        if sender.is_closed() {
            return;
        }
        tokio::time::sleep(retry).await;
    }
}
