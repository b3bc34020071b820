mod encryptor;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use crate::settings::types::Settings;

pub use encryptor::{decode_and_decrypt, digest_for_lookup, encrypt_and_encode};

pub async fn init_db(settings: &Settings) -> Result<DbConn, DbErr> {
    let mut options = ConnectOptions::new(settings.database.url.clone());
    // NOTE: every sqlite memory connection is a separate database.
    if settings.database.url.starts_with("sqlite") {
        options.max_connections(1).min_connections(1);
    }
    let db_conn = Database::connect(options).await?;
    Migrator::up(&db_conn, None).await?;
    Ok(db_conn)
}
