use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

use crate::error::GscError;

/// Value of `ENV` that switches credentials to the local env file.
pub const LOCAL_ENV: &str = "LOCAL";

/// Key holding the connection string, both in the env file and in Secret Manager.
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";

pub const DEFAULT_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1/";
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const ENV_KEYS: &[&str] = &[
    "ENV",
    "GOOGLE_CLOUD_PROJECT",
    "ENV_FILE",
    "LISTEN_ADDR",
    "LOGLEVEL",
    "DATABASE_MAX_CONNECTIONS",
    "PROXY",
    "SECRET_MANAGER_ENDPOINT",
    "METADATA_TOKEN_URL",
];

/// Where the database connection string comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    LocalFile,
    SecretManager,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "lenient_string")]
    pub env: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub google_cloud_project: Option<String>,
    pub env_file: PathBuf,
    pub listen_addr: String,
    pub loglevel: String,
    pub database_max_connections: u32,
    #[serde(default)]
    pub proxy: Option<Url>,
    pub secret_manager_endpoint: Url,
    pub metadata_token_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: None,
            google_cloud_project: None,
            env_file: PathBuf::from(".env"),
            listen_addr: "0.0.0.0:8080".to_string(),
            loglevel: "info".to_string(),
            database_max_connections: 5,
            proxy: None,
            secret_manager_endpoint: Url::parse(DEFAULT_SECRET_MANAGER_ENDPOINT)
                .expect("default Secret Manager endpoint is a valid URL"),
            metadata_token_url: Url::parse(DEFAULT_METADATA_TOKEN_URL)
                .expect("default metadata token URL is a valid URL"),
        }
    }
}

impl Config {
    /// Assemble configuration from defaults and the process environment.
    pub fn load() -> Result<Self, GscError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(ENV_KEYS)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, GscError> {
        Ok(figment.extract()?)
    }

    pub fn credential_source(&self) -> CredentialSource {
        match self.env.as_deref() {
            Some(LOCAL_ENV) => CredentialSource::LocalFile,
            _ => CredentialSource::SecretManager,
        }
    }
}

// Env values such as numeric project ids parse as numbers; keep them as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}
