use actix_web::{http, test, HttpMessage};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait};
use serde_json::{json, Value};
use uuid::Uuid;

use common::factory::{self, PushSubscriptionFactory};
use entities::push_subscription;
use web_adapters::AdminIdentity;

use crate::utils::{init_app, Connections, FakeRelay};

#[actix_web::test]
async fn happy_path() -> Result<(), DbErr> {
    let Connections {
        app, db, settings, ..
    } = init_app().await?;
    let relay = FakeRelay::start().await.unwrap();
    let admin_id = Uuid::now_v7();
    let delivered = factory::push_subscription(&settings)
        .encrypt_and_save_endpoint(relay.endpoint(201), &settings)
        .owner_id(admin_id)
        .insert(&db)
        .await?;
    let gone = factory::push_subscription(&settings)
        .encrypt_and_save_endpoint(relay.endpoint(410), &settings)
        .owner_id(admin_id)
        .insert(&db)
        .await?;
    let failing = factory::push_subscription(&settings)
        .encrypt_and_save_endpoint(relay.endpoint(500), &settings)
        .owner_id(admin_id)
        .insert(&db)
        .await?;
    let someone_elses = factory::push_subscription(&settings)
        .encrypt_and_save_endpoint(relay.endpoint(201), &settings)
        .owner_id(Uuid::now_v7())
        .insert(&db)
        .await?;

    let req = test::TestRequest::post()
        .uri("/admin/push/test")
        .insert_header((
            http::header::AUTHORIZATION,
            format!("Bearer {}", factory::admin_token(admin_id, &settings)),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::ACCEPTED);

    let res: Value = test::read_body_json(resp).await;
    assert_eq!(res, json!({ "sent": 1, "expired": 1, "failed": 1 }));

    let received = relay.received();
    assert_eq!(received.len(), 3);
    for request in &received {
        assert_eq!(request.content_encoding.as_deref(), Some("aes128gcm"));
        assert_eq!(
            request.content_type.as_deref(),
            Some("application/octet-stream")
        );
        assert_eq!(
            request.ttl.clone(),
            Some(settings.push.ttl_seconds.to_string())
        );
        assert!(request
            .authorization
            .as_deref()
            .unwrap()
            .starts_with("vapid t="));
        // salt + record size + key id length + key id + delimiter + tag
        assert!(request.body.len() > 16 + 4 + 1 + 65 + 1 + 16);
    }

    for (subscription, should_remain) in [
        (delivered, true),
        (gone, false),
        (failing, true),
        (someone_elses, true),
    ] {
        let in_db = push_subscription::Entity::find_by_id(subscription.id)
            .one(&db)
            .await?;
        assert_eq!(in_db.is_some(), should_remain);
    }

    relay.stop().await;
    Ok(())
}

#[actix_web::test]
async fn not_found_without_subscriptions() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let req = test::TestRequest::post()
        .uri("/admin/push/test")
        .to_request();
    req.extensions_mut().insert(AdminIdentity {
        admin_id: Uuid::now_v7(),
    });

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);

    Ok(())
}

#[actix_web::test]
async fn unauthorized_without_token() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let req = test::TestRequest::post()
        .uri("/admin/push/test")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);

    Ok(())
}

#[actix_web::test]
async fn unauthorized_with_invalid_token() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let req = test::TestRequest::post()
        .uri("/admin/push/test")
        .insert_header((http::header::AUTHORIZATION, "Bearer v4.local.forged"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);

    Ok(())
}
