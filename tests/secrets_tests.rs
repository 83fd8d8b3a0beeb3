use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use gsc_backend::{
    GscError,
    secrets::{LocalEnvFile, SecretManager, SecretSource},
};
use serde_json::json;
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use url::Url;

const TOKEN: &str = "test-token";

fn unique(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    format!("{}_{}_{}", tag, std::process::id(), nanos)
}

fn temp_env_file(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("gsc-backend-{}.env", unique("env")));
    fs::write(&path, contents).expect("failed to write env file");
    path
}

#[tokio::test]
async fn local_env_file_provides_database_url() {
    let key = unique("GSC_TEST_DATABASE_URL");
    let path = temp_env_file(&format!("{key}=postgres://app:pw@localhost:5432/cars\n"));

    let source = LocalEnvFile::new(path.clone(), key.as_str());
    let url = source.resolve().await.expect("resolve failed");
    assert_eq!(url, "postgres://app:pw@localhost:5432/cars");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn local_env_file_missing_is_an_error() {
    let mut path = std::env::temp_dir();
    path.push(format!("gsc-backend-{}.env", unique("missing")));

    let source = LocalEnvFile::new(path.clone(), "DATABASE_URL");
    assert!(matches!(
        source.resolve().await,
        Err(GscError::EnvFile(_))
    ));
}

#[tokio::test]
async fn local_env_file_without_key_is_an_error() {
    let key = unique("GSC_TEST_ABSENT");
    let path = temp_env_file("SOMETHING_ELSE=1\n");

    let source = LocalEnvFile::new(path.clone(), key.as_str());
    assert!(matches!(
        source.resolve().await,
        Err(GscError::MissingDatabaseUrl(k)) if k == key
    ));

    let _ = fs::remove_file(&path);
}

async fn metadata_token(headers: HeaderMap) -> Response {
    if headers.get("metadata-flavor").and_then(|v| v.to_str().ok()) != Some("Google") {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!({ "access_token": TOKEN, "expires_in": 3599, "token_type": "Bearer" }))
        .into_response()
}

async fn access_secret(
    Path((project, secret, version)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token");
    if !authorized || project != "gsc-test" {
        return StatusCode::FORBIDDEN.into_response();
    }
    if secret != "DATABASE_URL" || version != "latest:access" {
        return StatusCode::NOT_FOUND.into_response();
    }
    // "postgres://app@db/cars"
    Json(json!({
        "name": format!("projects/{project}/secrets/{secret}/versions/7"),
        "payload": { "data": "cG9zdGdyZXM6Ly9hcHBAZGIvY2Fycw==" }
    }))
    .into_response()
}

async fn spawn_fake_google() -> String {
    let app = Router::new()
        .route("/token", get(metadata_token))
        .route(
            "/v1/projects/{project}/secrets/{secret}/versions/{version}",
            get(access_secret),
        );
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn manager(base: &str, project: &str) -> SecretManager {
    SecretManager::new(
        project,
        "DATABASE_URL",
        Url::parse(&format!("{base}/v1/")).unwrap(),
        Url::parse(&format!("{base}/token")).unwrap(),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn secret_manager_returns_decoded_payload() {
    let base = spawn_fake_google().await;
    let url = manager(&base, "gsc-test")
        .resolve()
        .await
        .expect("resolve failed");
    assert_eq!(url, "postgres://app@db/cars");
}

#[tokio::test]
async fn secret_manager_permission_denied_is_an_error() {
    let base = spawn_fake_google().await;
    let err = manager(&base, "someone-else")
        .resolve()
        .await
        .unwrap_err();
    match err {
        GscError::Reqwest(e) => assert_eq!(e.status(), Some(reqwest::StatusCode::FORBIDDEN)),
        other => panic!("unexpected error: {other}"),
    }
}
