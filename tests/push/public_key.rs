use actix_web::{http, test};
use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use sea_orm::DbErr;
use types::PublicKeyResponse;

use crate::utils::{init_app, Connections};

#[actix_web::test]
async fn happy_path() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let req = test::TestRequest::get().uri("/push/public-key").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), http::StatusCode::OK);

    let res: PublicKeyResponse = test::read_body_json(resp).await;
    assert_eq!(
        res.public_key,
        "BHEhZlCtNkz8Y-KWBvw4dSgvrRFw71LnMoJ301RnKh07jo4I399kFm7bCMIjMsH9wRHU1z5ZlK7VDjTTrBszW2U"
    );
    let decoded = BASE64_URL_SAFE_NO_PAD.decode(&res.public_key).unwrap();
    assert_eq!(decoded.len(), 65);
    assert_eq!(decoded[0], 0x04);

    Ok(())
}

#[actix_web::test]
async fn same_key_on_every_call() -> Result<(), DbErr> {
    let Connections { app, .. } = init_app().await?;

    let mut keys = vec![];
    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/push/public-key").to_request();
        let res: PublicKeyResponse = test::call_and_read_body_json(&app, req).await;
        keys.push(res.public_key);
    }
    assert_eq!(keys[0], keys[1]);

    Ok(())
}
