use actix_web::{http, test};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{
    db::{decode_and_decrypt, digest_for_lookup},
    factory::{self, TEST_AUTH_KEY, TEST_P256DH_KEY},
};
use entities::push_subscription;
use types::{PushSubscriptionJson, PushSubscriptionKeys, PushSubscriptionVisible};

use crate::utils::{init_app, Connections};

fn subscription_json(endpoint: &str) -> PushSubscriptionJson {
    PushSubscriptionJson {
        endpoint: endpoint.to_string(),
        expiration_time: None,
        keys: PushSubscriptionKeys {
            p256dh: TEST_P256DH_KEY.to_string(),
            auth: TEST_AUTH_KEY.to_string(),
        },
    }
}

#[actix_web::test]
async fn happy_path() -> Result<(), DbErr> {
    let Connections {
        app, db, settings, ..
    } = init_app().await?;
    let endpoint = "https://relay.test/push/happy-path";

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .set_json(PushSubscriptionJson {
            expiration_time: Some(1759125917),
            ..subscription_json(endpoint)
        })
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::CREATED);

    let res: PushSubscriptionVisible = test::read_body_json(resp).await;
    assert_eq!(res.endpoint, endpoint);
    assert_eq!(res.expiration_time, Some(1759125917));

    let sub_in_db = push_subscription::Entity::find()
        .filter(
            push_subscription::Column::EndpointDigest
                .eq(digest_for_lookup(endpoint, &settings).unwrap()),
        )
        .one(&db)
        .await?
        .unwrap();
    assert_eq!(sub_in_db.owner_id, None);
    assert_eq!(sub_in_db.expiration_epoch_time, Some(1759125917));
    assert_ne!(sub_in_db.endpoint, endpoint);
    assert_eq!(
        decode_and_decrypt(sub_in_db.endpoint, &settings).unwrap(),
        endpoint
    );
    assert_eq!(
        decode_and_decrypt(sub_in_db.p256dh_key, &settings).unwrap(),
        TEST_P256DH_KEY
    );
    assert_eq!(
        decode_and_decrypt(sub_in_db.auth_key, &settings).unwrap(),
        TEST_AUTH_KEY
    );

    Ok(())
}

#[actix_web::test]
async fn subscribing_twice_keeps_one_record() -> Result<(), DbErr> {
    let Connections { app, db, .. } = init_app().await?;
    let endpoint = "https://relay.test/push/twice";

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .set_json(subscription_json(endpoint))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .set_json(PushSubscriptionJson {
            expiration_time: Some(1800000000),
            ..subscription_json(endpoint)
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::OK);

    let subs_in_db = push_subscription::Entity::find().all(&db).await?;
    assert_eq!(subs_in_db.len(), 1);
    assert_eq!(subs_in_db[0].expiration_epoch_time, Some(1800000000));

    Ok(())
}

#[actix_web::test]
async fn bearer_token_sets_owner_and_anonymous_resubscribe_keeps_it() -> Result<(), DbErr> {
    let Connections {
        app, db, settings, ..
    } = init_app().await?;
    let admin_id = Uuid::now_v7();
    let endpoint = "https://relay.test/push/owned";

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .insert_header((
            http::header::AUTHORIZATION,
            format!("Bearer {}", factory::admin_token(admin_id, &settings)),
        ))
        .set_json(subscription_json(endpoint))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .set_json(subscription_json(endpoint))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::OK);

    let owned = push_subscription::Entity::find()
        .filter(push_subscription::Column::OwnerId.eq(admin_id))
        .count(&db)
        .await?;
    assert_eq!(owned, 1);

    Ok(())
}

#[actix_web::test]
async fn bad_request_on_relative_endpoint() -> Result<(), DbErr> {
    let Connections { app, db, .. } = init_app().await?;

    let req = test::TestRequest::post()
        .uri("/push/subscribe")
        .set_json(subscription_json("/push/not-absolute"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(push_subscription::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[actix_web::test]
async fn bad_request_on_undecodable_keys() -> Result<(), DbErr> {
    let Connections { app, db, .. } = init_app().await?;

    for keys in [
        PushSubscriptionKeys {
            p256dh: "too-short".to_string(),
            auth: TEST_AUTH_KEY.to_string(),
        },
        PushSubscriptionKeys {
            p256dh: TEST_P256DH_KEY.to_string(),
            auth: "AAAA".to_string(),
        },
    ] {
        let req = test::TestRequest::post()
            .uri("/push/subscribe")
            .set_json(PushSubscriptionJson {
                keys,
                ..subscription_json("https://relay.test/push/bad-keys")
            })
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }
    assert_eq!(push_subscription::Entity::find().count(&db).await?, 0);

    Ok(())
}
