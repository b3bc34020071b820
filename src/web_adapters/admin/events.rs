use std::time::Duration;

use actix_web::{
    get,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    web::{Bytes, Data, ReqData},
    HttpResponse,
};
use futures::{
    future::ready,
    stream::{self, Stream, StreamExt},
};
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    time::{interval_at, Instant, Interval},
};
use tracing::{event, Level};

use common::settings::types::Settings;
use types::BroadcastEvent;
use use_cases::realtime::EventBroadcaster;

use crate::{middlewares::auth::AdminIdentity, utils::response_401};

const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";

#[tracing::instrument(name = "Streaming admin events", skip(broadcaster, settings, admin))]
#[get("/events")]
pub async fn stream_events_endpoint(
    broadcaster: Data<EventBroadcaster>,
    settings: Data<Settings>,
    admin: Option<ReqData<AdminIdentity>>,
) -> HttpResponse {
    match admin {
        Some(_) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/event-stream"))
            .insert_header((CACHE_CONTROL, "no-cache"))
            .insert_header(("X-Accel-Buffering", "no"))
            .streaming(event_stream(
                broadcaster.subscribe(),
                Duration::from_secs(settings.broadcast.keep_alive_seconds.max(1)),
                Duration::from_millis(settings.broadcast.retry_milliseconds),
            )),
        None => response_401(),
    }
}

/// SSE body: a `retry` hint, then one frame per broadcast event with
/// keep-alive comments while idle. Ends when the broadcaster is dropped.
fn event_stream(
    receiver: Receiver<BroadcastEvent>,
    keep_alive: Duration,
    retry: Duration,
) -> impl Stream<Item = Result<Bytes, actix_web::Error>> {
    let retry_frame = Bytes::from(format!("retry: {}\n\n", retry.as_millis()));
    let keep_alive = interval_at(Instant::now() + keep_alive, keep_alive);

    stream::once(ready(Ok::<_, actix_web::Error>(retry_frame))).chain(stream::unfold(
        (receiver, keep_alive),
        |(mut receiver, mut keep_alive)| async move {
            let frame = next_frame(&mut receiver, &mut keep_alive).await?;
            Some((Ok::<_, actix_web::Error>(frame), (receiver, keep_alive)))
        },
    ))
}

async fn next_frame(
    receiver: &mut Receiver<BroadcastEvent>,
    keep_alive: &mut Interval,
) -> Option<Bytes> {
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(broadcast_event) => match event_frame(&broadcast_event) {
                    Ok(frame) => return Some(frame),
                    Err(e) => {
                        event!(target: "backend", Level::ERROR, "Error serializing event: {:?}", e)
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    event!(Level::WARN, skipped, "Admin event stream lagged, events skipped");
                }
                Err(RecvError::Closed) => return None,
            },
            _ = keep_alive.tick() => return Some(Bytes::from_static(KEEP_ALIVE_FRAME)),
        }
    }
}

fn event_frame(broadcast_event: &BroadcastEvent) -> Result<Bytes, serde_json::Error> {
    Ok(Bytes::from(format!(
        "event: {}\ndata: {}\n\n",
        broadcast_event.event_name(),
        serde_json::to_string(broadcast_event)?
    )))
}
