//! Resolution of the database connection string.
//!
//! Layout:
//! - `local.rs`: env-file backed source used when `ENV=LOCAL`
//! - `secret_manager.rs`: Google Secret Manager backed source used everywhere else

pub mod local;
pub mod secret_manager;

use futures::future::BoxFuture;
use url::Url;

use crate::config::{Config, CredentialSource, DATABASE_URL_KEY};
use crate::error::GscError;

pub use local::LocalEnvFile;
pub use secret_manager::SecretManager;

/// A place the connection string can be read from.
pub trait SecretSource: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<String, GscError>>;

    /// Short label for logs.
    fn describe(&self) -> &'static str;
}

/// Pick the source for this deployment. Called once at startup.
pub fn from_config(cfg: &Config) -> Result<Box<dyn SecretSource>, GscError> {
    match cfg.credential_source() {
        CredentialSource::LocalFile => Ok(Box::new(LocalEnvFile::new(
            cfg.env_file.clone(),
            DATABASE_URL_KEY,
        ))),
        CredentialSource::SecretManager => Ok(Box::new(SecretManager::from_config(cfg)?)),
    }
}

/// Render a connection string safe for logs: password and query dropped.
pub fn redact(connection_string: &str) -> String {
    let Ok(mut url) = Url::parse(connection_string) else {
        return "<redacted>".to_string();
    };
    if url.password().is_some() && url.set_password(Some("***")).is_err() {
        return "<redacted>".to_string();
    }
    url.set_query(None);
    url.to_string()
}
