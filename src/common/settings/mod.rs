use std::{env, str::FromStr};

use crate::settings::types::{
    ApplicationSettings, BroadcastSettings, DatabaseSettings, Environment, PushSettings,
    SecretSettings, Settings,
};

pub mod types;

const TEST_ENV_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../.env.testing");

pub fn get_settings(env_file_name: &str) -> Result<Settings, String> {
    dotenvy::from_filename(env_file_name)
        .map_err(|e| format!("Failed to fetch env file: {}", e))?;

    match Environment::try_from(env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "production".into()))
    {
        Ok(env) => match env {
            Environment::Testing => get_testing_settings(),
            Environment::Development => get_development_settings(),
            Environment::Production => get_production_settings(),
        },
        Err(e) => Err(format!("Failed to parse APP_ENVIRONMENT: {}", e)),
    }
}

pub fn get_test_settings() -> Settings {
    get_settings(TEST_ENV_FILE).expect("Error on getting settings.")
}

fn get_testing_settings() -> Result<Settings, String> {
    let b = Settings::base_settings();
    merge_env(Settings {
        application: ApplicationSettings {
            protocol: "http".to_string(),
            host: "127.0.0.1".to_string(),
            base_url: "http://127.0.0.1".to_string(),
            port: 0,
            ..b.application
        },
        debug: true,
        ..b
    })
}

fn get_development_settings() -> Result<Settings, String> {
    let b = Settings::base_settings();
    merge_env(Settings {
        application: ApplicationSettings {
            protocol: "http".to_string(),
            host: "127.0.0.1".to_string(),
            base_url: "http://127.0.0.1".to_string(),
            ..b.application
        },
        debug: true,
        ..b
    })
}

fn get_production_settings() -> Result<Settings, String> {
    let b = Settings::base_settings();
    merge_env(Settings {
        application: ApplicationSettings {
            protocol: "https".to_string(),
            host: "0.0.0.0".to_string(),
            base_url: "".to_string(),
            ..b.application
        },
        debug: false,
        ..b
    })
}

fn merge_env(s: Settings) -> Result<Settings, String> {
    Ok(Settings {
        application: ApplicationSettings {
            port: get_env_var_or("APP_PORT", s.application.port)?,
            vapid_private_key: get_env_var("VAPID_PRIVATE_KEY")?,
            app_owner_email: get_env_var("APP_OWNER_EMAIL")?,
            ..s.application
        },
        database: DatabaseSettings {
            url: get_env_var("DATABASE_URL")?,
            encryption_key: get_env_var("DATABASE_ENCRYPTION_KEY")?,
        },
        debug: match env::var("APP_DEBUG") {
            Ok(debug) => &debug == "true",
            Err(_) => s.debug,
        },
        secret: SecretSettings {
            secret_key: get_env_var("APP_SECRET__SECRET_KEY")?,
            hmac_secret: get_env_var("APP_SECRET__HMAC_SECRET")?,
        },
        push: PushSettings {
            ttl_seconds: get_env_var_or("APP_PUSH__TTL_SECONDS", s.push.ttl_seconds)?,
        },
        broadcast: BroadcastSettings {
            capacity: get_env_var_or("APP_BROADCAST__CAPACITY", s.broadcast.capacity)?,
            keep_alive_seconds: get_env_var_or(
                "APP_BROADCAST__KEEP_ALIVE_SECONDS",
                s.broadcast.keep_alive_seconds,
            )?,
            retry_milliseconds: get_env_var_or(
                "APP_BROADCAST__RETRY_MILLISECONDS",
                s.broadcast.retry_milliseconds,
            )?,
        },
    })
}

fn get_env_var(key: &str) -> Result<String, String> {
    env::var(key).map_err(|e| format!("{}: {}", key, e))
}

fn get_env_var_or<T: FromStr>(key: &str, default: T) -> Result<T, String>
where
    T::Err: ToString,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{}: {}", key, e.to_string())),
        Err(_) => Ok(default),
    }
}
