use futures::future::BoxFuture;
use std::path::PathBuf;
use tracing::info;

use super::SecretSource;
use crate::error::GscError;

/// Reads the connection string from a `.env`-style file.
///
/// The file is loaded into the process environment first; variables that
/// are already set keep their values.
pub struct LocalEnvFile {
    path: PathBuf,
    key: String,
}

impl LocalEnvFile {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    fn load(&self) -> Result<String, GscError> {
        dotenvy::from_path(&self.path)?;
        info!(path = %self.path.display(), "loaded env file");
        match std::env::var(&self.key) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(GscError::MissingDatabaseUrl(self.key.clone())),
        }
    }
}

impl SecretSource for LocalEnvFile {
    fn resolve(&self) -> BoxFuture<'_, Result<String, GscError>> {
        Box::pin(async move { self.load() })
    }

    fn describe(&self) -> &'static str {
        "local env file"
    }
}
