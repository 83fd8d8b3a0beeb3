use base64::Engine;
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::SecretSource;
use crate::config::{Config, DATABASE_URL_KEY};
use crate::error::GscError;

/// Reads the latest version of a secret from Google Secret Manager.
///
/// Authentication uses the instance metadata server, which is what Cloud Run
/// exposes to the running service account.
pub struct SecretManager {
    project_id: String,
    secret: String,
    endpoint: Url,
    token_url: Url,
    http: reqwest::Client,
}

impl SecretManager {
    pub fn new(
        project_id: impl Into<String>,
        secret: impl Into<String>,
        endpoint: Url,
        token_url: Url,
        http: reqwest::Client,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            secret: secret.into(),
            endpoint,
            token_url,
            http,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, GscError> {
        let project_id = cfg
            .google_cloud_project
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(GscError::MissingProjectId)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("gsc-backend/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Ok(Self::new(
            project_id,
            DATABASE_URL_KEY,
            cfg.secret_manager_endpoint.clone(),
            cfg.metadata_token_url.clone(),
            builder.build()?,
        ))
    }

    /// Fully-qualified name of the latest secret version.
    pub fn resource_name(&self) -> String {
        format!(
            "projects/{}/secrets/{}/versions/latest",
            self.project_id, self.secret
        )
    }

    async fn access_token(&self) -> Result<String, GscError> {
        let token: MetadataToken = self
            .http
            .get(self.token_url.clone())
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(token_type = %token.token_type, "fetched metadata access token");
        Ok(token.access_token)
    }

    async fn access_latest(&self) -> Result<String, GscError> {
        let token = self.access_token().await?;
        let url = self
            .endpoint
            .join(&format!("{}:access", self.resource_name()))?;

        let resp: AccessSecretVersionResponse = self
            .http
            .get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let value = resp.decode()?;
        info!(secret = %self.resource_name(), "accessed secret version");
        Ok(value)
    }
}

impl SecretSource for SecretManager {
    fn resolve(&self) -> BoxFuture<'_, Result<String, GscError>> {
        Box::pin(self.access_latest())
    }

    fn describe(&self) -> &'static str {
        "secret manager"
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: Option<String>,
}

impl AccessSecretVersionResponse {
    fn decode(self) -> Result<String, GscError> {
        let data = self
            .payload
            .and_then(|p| p.data)
            .ok_or(GscError::MissingSecretPayload)?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(data)?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager(project: &str) -> SecretManager {
        SecretManager::new(
            project,
            DATABASE_URL_KEY,
            Url::parse("https://secretmanager.googleapis.com/v1/").unwrap(),
            Url::parse("http://metadata.google.internal/token").unwrap(),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn resource_name_targets_latest_version() {
        assert_eq!(
            manager("gsc-prod").resource_name(),
            "projects/gsc-prod/secrets/DATABASE_URL/versions/latest"
        );
    }

    #[test]
    fn payload_is_base64_decoded() {
        let resp: AccessSecretVersionResponse = serde_json::from_value(json!({
            "name": "projects/1/secrets/DATABASE_URL/versions/3",
            "payload": { "data": "cG9zdGdyZXM6Ly9hcHBAZGIvY2Fycw==", "dataCrc32c": "1" }
        }))
        .unwrap();
        assert_eq!(resp.decode().unwrap(), "postgres://app@db/cars");
    }

    #[test]
    fn missing_payload_is_an_error() {
        let resp: AccessSecretVersionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(resp.decode(), Err(GscError::MissingSecretPayload)));
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let resp: AccessSecretVersionResponse =
            serde_json::from_value(json!({ "payload": { "data": "%%%" } })).unwrap();
        assert!(matches!(resp.decode(), Err(GscError::SecretDecode(_))));
    }
}
