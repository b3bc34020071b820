use actix_web::{http, test};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait};

use common::factory::{self, PushSubscriptionFactory};
use entities::push_subscription;
use types::PushUnsubscribeRequest;

use crate::utils::{init_app, Connections};

#[actix_web::test]
async fn happy_path() -> Result<(), DbErr> {
    let Connections {
        app, db, settings, ..
    } = init_app().await?;
    let endpoint = "https://relay.test/push/to-delete";
    let subscription = factory::push_subscription(&settings)
        .encrypt_and_save_endpoint(endpoint.to_string(), &settings)
        .insert(&db)
        .await?;
    let other = factory::push_subscription(&settings).insert(&db).await?;

    let req = test::TestRequest::delete()
        .uri("/push/subscribe")
        .set_json(PushUnsubscribeRequest {
            endpoint: endpoint.to_string(),
        })
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

    let sub_in_db = push_subscription::Entity::find_by_id(subscription.id)
        .one(&db)
        .await?;
    assert_eq!(sub_in_db, None);
    let other_in_db = push_subscription::Entity::find_by_id(other.id)
        .one(&db)
        .await?;
    assert!(other_in_db.is_some());

    Ok(())
}

#[actix_web::test]
async fn no_content_for_unknown_endpoint() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let req = test::TestRequest::delete()
        .uri("/push/subscribe")
        .set_json(PushUnsubscribeRequest {
            endpoint: "https://relay.test/push/never-subscribed".to_string(),
        })
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

    Ok(())
}
