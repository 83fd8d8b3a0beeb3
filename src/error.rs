use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

pub const FETCH_CARS_FAILED: &str = "Failed to fetch cars";
pub const SCAN_ROW_FAILED: &str = "Error scanning row";

#[derive(Debug, ThisError)]
pub enum GscError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error loading env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("{0} is not set")]
    MissingDatabaseUrl(String),

    #[error("GOOGLE_CLOUD_PROJECT is not set")]
    MissingProjectId,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Secret payload is missing")]
    MissingSecretPayload,

    #[error("Secret payload is not valid base64: {0}")]
    SecretDecode(#[from] base64::DecodeError),

    #[error("Secret payload is not valid UTF-8: {0}")]
    SecretUtf8(#[from] std::string::FromUtf8Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Cars query failed: {0}")]
    CarsQuery(#[source] SqlxError),

    #[error("Cars row scan failed: {0}")]
    CarsScan(#[source] SqlxError),
}

impl IntoResponse for GscError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        let body = match self {
            GscError::CarsQuery(_) => FETCH_CARS_FAILED,
            GscError::CarsScan(_) => SCAN_ROW_FAILED,
            _ => "Internal Server Error",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
