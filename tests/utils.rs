use std::{net::TcpListener, sync::Mutex};

use actix_http::Request;
use actix_web::{
    dev::{Service, ServerHandle, ServiceResponse},
    http::StatusCode,
    test,
    web::{self, Bytes, Data},
    App, HttpRequest, HttpResponse, HttpServer,
};
use sea_orm::{DbConn, DbErr};

use common::{
    db::init_db,
    settings::{get_test_settings, types::Settings},
};
use use_cases::realtime::EventBroadcaster;
use web_adapters::AuthenticateAdmin;

pub struct Connections<S> {
    pub app: S,
    pub db: DbConn,
    pub settings: Settings,
    pub broadcaster: EventBroadcaster,
}

pub async fn init_app() -> Result<
    Connections<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>>,
    DbErr,
> {
    let settings = get_test_settings();
    let db = init_db(&settings).await?;
    let broadcaster = EventBroadcaster::from_settings(&settings);
    let app = test::init_service(
        App::new()
            .wrap(AuthenticateAdmin)
            .service(server::get_routes())
            .app_data(Data::new(db.clone()))
            .app_data(Data::new(settings.clone()))
            .app_data(Data::new(broadcaster.clone()))
            .app_data(Data::new(relay_client())),
    )
    .await;
    Ok(Connections {
        app,
        db,
        settings,
        broadcaster,
    })
}

// Test servers listen on loopback, so a proxy from the environment must not apply.
pub fn relay_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build reqwest client")
}

/// The full application on a loopback port, for clients that need a real socket.
pub struct LiveServer {
    pub base_url: String,
    pub db: DbConn,
    pub settings: Settings,
    pub broadcaster: EventBroadcaster,
    handle: ServerHandle,
}

impl LiveServer {
    pub async fn start() -> Result<Self, DbErr> {
        let settings = get_test_settings();
        let db = init_db(&settings).await?;
        let broadcaster = EventBroadcaster::from_settings(&settings);

        let io_error = |e: std::io::Error| DbErr::Custom(e.to_string());
        let listener = TcpListener::bind("127.0.0.1:0").map_err(io_error)?;
        let base_url = format!("http://{}", listener.local_addr().map_err(io_error)?);

        let (app_db, app_settings, app_broadcaster) =
            (db.clone(), settings.clone(), broadcaster.clone());
        let server = HttpServer::new(move || {
            App::new()
                .wrap(AuthenticateAdmin)
                .service(server::get_routes())
                .app_data(Data::new(app_db.clone()))
                .app_data(Data::new(app_settings.clone()))
                .app_data(Data::new(app_broadcaster.clone()))
                .app_data(Data::new(relay_client()))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)
        .map_err(io_error)?
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            base_url,
            db,
            settings,
            broadcaster,
            handle,
        })
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

#[derive(Clone, Debug)]
pub struct RelayRequest {
    pub path: String,
    pub content_encoding: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub ttl: Option<String>,
    pub body: Bytes,
}

/// A push relay stand-in. `POST /{status}/{id}` answers with `{status}`,
/// so a subscription endpoint decides what the relay will say about it.
pub struct FakeRelay {
    pub base_url: String,
    pub requests: Data<Mutex<Vec<RelayRequest>>>,
    handle: ServerHandle,
}

impl FakeRelay {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Data::new(Mutex::new(Vec::<RelayRequest>::new()));

        let app_requests = requests.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_requests.clone())
                .route("/{status}/{id}", web::post().to(receive_push))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)?
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            base_url,
            requests,
            handle,
        })
    }

    pub fn endpoint(&self, status: u16) -> String {
        format!("{}/{}/{}", self.base_url, status, uuid::Uuid::now_v7())
    }

    pub fn received(&self) -> Vec<RelayRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn receive_push(
    req: HttpRequest,
    path: web::Path<(u16, String)>,
    body: Bytes,
    requests: Data<Mutex<Vec<RelayRequest>>>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    };
    requests.lock().unwrap().push(RelayRequest {
        path: req.path().to_string(),
        content_encoding: header("content-encoding"),
        content_type: header("content-type"),
        authorization: header("authorization"),
        ttl: header("ttl"),
        body,
    });
    let (status, _) = path.into_inner();
    HttpResponse::build(StatusCode::from_u16(status).unwrap()).finish()
}
