use std::pin::pin;

use actix_web::{body::MessageBody, http, test, web::Bytes};
use futures::future::poll_fn;
use sea_orm::DbErr;
use uuid::Uuid;

use common::factory;
use types::BroadcastItem;

use crate::utils::{init_app, Connections};

#[actix_web::test]
async fn happy_path() -> Result<(), DbErr> {
    let Connections {
        app,
        settings,
        broadcaster,
        ..
    } = init_app().await?;

    let req = test::TestRequest::get()
        .uri("/admin/events")
        .insert_header((
            http::header::AUTHORIZATION,
            format!("Bearer {}", factory::admin_token(Uuid::now_v7(), &settings)),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    assert_eq!(broadcaster.listener_count(), 1);

    let mut body = pin!(resp.into_body());
    let retry = poll_fn(|cx| body.as_mut().poll_next(cx))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        retry,
        Bytes::from(format!(
            "retry: {}\n\n",
            settings.broadcast.retry_milliseconds
        ))
    );

    let delivered = broadcaster
        .announce_new_contact(BroadcastItem::new("A").with_field("email", "lead@example.com"));
    assert_eq!(delivered, 1);

    let frame = poll_fn(|cx| body.as_mut().poll_next(cx))
        .await
        .unwrap()
        .unwrap();
    let frame = String::from_utf8(frame.to_vec()).unwrap();
    assert!(frame.starts_with("event: newContact\ndata: "));
    assert!(frame.ends_with("\n\n"));
    let data: serde_json::Value =
        serde_json::from_str(frame.trim_end().split_once("data: ").unwrap().1).unwrap();
    assert_eq!(
        data,
        serde_json::json!({
            "type": "newContact",
            "item": { "_id": "A", "email": "lead@example.com" }
        })
    );

    Ok(())
}

#[actix_web::test]
async fn unauthorized_without_token() -> Result<(), DbErr> {
    let Connections {
        app, broadcaster, ..
    } = init_app().await?;

    let req = test::TestRequest::get().uri("/admin/events").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
    assert_eq!(broadcaster.listener_count(), 0);

    Ok(())
}
