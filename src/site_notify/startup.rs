use actix_web::{dev::Server, web::Data, App, HttpServer};
use sea_orm::DbConn;

use common::{db::init_db, settings::types::Settings};
use server::get_routes;
use use_cases::realtime::EventBroadcaster;
use web_adapters::AuthenticateAdmin;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let db = init_db(&settings)
            .await
            .map_err(|e| std::io::Error::other(format!("Failed to open DB connection: {}", e)))?;
        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );

        let listener = std::net::TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        // Record-creating handlers reach the broadcaster through `Data<EventBroadcaster>`.
        let broadcaster = EventBroadcaster::from_settings(&settings);
        let server = run(listener, db, settings, broadcaster)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: std::net::TcpListener,
    db: DbConn,
    settings: Settings,
    broadcaster: EventBroadcaster,
) -> Result<Server, std::io::Error> {
    let broadcaster = Data::new(broadcaster);
    let client = Data::new(reqwest::Client::new());
    let db = Data::new(db);
    let settings = Data::new(settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(AuthenticateAdmin)
            .service(get_routes())
            .app_data(db.clone())
            .app_data(settings.clone())
            .app_data(broadcaster.clone())
            .app_data(client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
