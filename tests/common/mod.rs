#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tower::ServiceExt;

use menu_catalog::config::AppConfig;
use menu_catalog::state::AppState;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "changeme";

/// Fresh in-memory state with schema and seed applied.
pub async fn test_state() -> Result<AppState> {
    Ok(AppState::new(AppConfig::in_memory()).await?)
}

/// Router over a fresh in-memory store.
pub async fn test_app() -> Result<Router> {
    Ok(menu_catalog::app(test_state().await?))
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{}:{}", user, pass)))
}

pub fn admin_auth() -> String {
    basic_auth(ADMIN_USER, ADMIN_PASS)
}

/// Path plus a correctly percent-encoded query string.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let url = reqwest::Url::parse_with_params(&format!("http://localhost{}", path), params)
        .expect("valid test url");
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drive one request through the router. Non-JSON bodies come back as a JSON string.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    Ok(TestResponse { status, headers, body })
}

pub async fn get(app: &Router, uri: &str) -> Result<TestResponse> {
    send(app, Method::GET, uri, None, None).await
}

/// POST as admin, asserting 201, returning the created item.
pub async fn create_item(app: &Router, body: Value) -> Result<Value> {
    let res = send(app, Method::POST, "/api/items", Some(&admin_auth()), Some(body)).await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {} {}", res.status, res.body);
    Ok(res.body)
}

pub async fn list_items(app: &Router, uri: &str) -> Result<Vec<Value>> {
    let res = get(app, uri).await?;
    anyhow::ensure!(res.status == StatusCode::OK, "list failed: {} {}", res.status, res.body);
    res.body.as_array().cloned().context("list body is not an array")
}

/// The real binary, listening on a free port against a throwaway database file.
pub struct TestServer {
    pub base_url: String,
    db_path: std::path::PathBuf,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let db_path = std::env::temp_dir().join(format!("menu-catalog-test-{}.db", port));
        let _ = std::fs::remove_file(&db_path);

        let child = Command::new(env!("CARGO_BIN_EXE_menu-catalog"))
            .env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("DATABASE_PATH", &db_path)
            .env("ADMIN_USER", ADMIN_USER)
            .env("ADMIN_PASS", ADMIN_PASS)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { base_url, db_path, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.db_path);
    }
}
