use serde::Deserialize;

#[derive(Deserialize, Clone, Default, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub debug: bool,
    pub secret: SecretSettings,
    pub push: PushSettings,
    pub broadcast: BroadcastSettings,
}

impl Settings {
    pub fn base_settings() -> Self {
        Self {
            application: ApplicationSettings {
                port: 5000,
                max_log_files: 14,
                ..Default::default()
            },
            push: PushSettings {
                ttl_seconds: 60 * 60 * 23,
            },
            broadcast: BroadcastSettings {
                capacity: 256,
                keep_alive_seconds: 15,
                retry_milliseconds: 3000,
            },
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    pub base_url: String,
    pub protocol: String,
    pub max_log_files: usize,
    pub vapid_private_key: String,
    pub app_owner_email: String,
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub encryption_key: String,
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct SecretSettings {
    pub secret_key: String,
    pub hmac_secret: String,
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct PushSettings {
    pub ttl_seconds: u64,
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct BroadcastSettings {
    pub capacity: usize,
    pub keep_alive_seconds: u64,
    pub retry_milliseconds: u64,
}

pub enum Environment {
    Testing,
    Development,
    Production,
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "testing" => Ok(Self::Testing),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!("{} is not a supported environment.", other)),
        }
    }
}
