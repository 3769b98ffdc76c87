#![allow(dead_code)] // not every test binary uses every helper

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use orgmgmt_api_rust::auth::{generate_jwt_with_secret, Claims};

/// Base64 secret shared between the spawned server and the token helper.
pub const TEST_JWT_SECRET: &str = "aW50ZWdyYXRpb24tdGVzdC1zZWNyZXQta2V5";

pub const ALL_ORG_AUTHORITIES: &[&str] = &[
    "ORGANIZATION_READ",
    "ORGANIZATION_CREATE",
    "ORGANIZATION_UPDATE",
    "ORGANIZATION_DELETE",
];

static SERVER: OnceLock<Option<TestServer>> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Stub user/survey collaborators so membership flows have something
        // to probe and notify
        let stub_port = spawn_stub_collaborators()?;
        let stub_url = format!("http://127.0.0.1:{}", stub_port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/orgmgmt-api-rust");
        cmd.env("ORGMGMT_API_PORT", port.to_string())
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env("USER_SERVICE_URL", &stub_url)
            .env("SURVEY_SERVICE_URL", &stub_url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Spawn the server once per test binary. Returns None when no database is
/// configured so suites can skip instead of failing in bare environments.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }

    let server = SERVER
        .get_or_init(|| Some(TestServer::spawn().expect("failed to spawn server binary")))
        .as_ref()
        .expect("server slot initialized");
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// Mint a bearer token the spawned server will accept.
pub fn token(organization_id: Option<Uuid>, authorities: &[&str]) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: "integration-test".to_string(),
        authorities: authorities.iter().map(|s| s.to_string()).collect(),
        organization_id,
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };

    generate_jwt_with_secret(&claims, TEST_JWT_SECRET).expect("failed to mint test token")
}

pub fn root_token() -> String {
    token(None, &["SYS_ADMIN_ROOT"])
}

/// Create an organization through the public bootstrap path and return its id.
pub async fn bootstrap_organization(base_url: &str, name: &str) -> Result<Uuid> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/organizations", base_url))
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "bootstrap failed: {}", res.status());

    let body: serde_json::Value = res.json().await?;
    Ok(body["id"].as_str().context("missing id")?.parse()?)
}

/// In-process stand-ins for the user-service and survey-service. Every user
/// and survey exists; placement calls always succeed. Runs on its own thread
/// so it outlives any single test runtime.
fn spawn_stub_collaborators() -> Result<u16> {
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("stub collaborator runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind stub collaborator listener");
            let port = listener.local_addr().expect("stub addr").port();
            tx.send(port).expect("report stub port");

            axum::serve(listener, stub_router()).await.expect("stub collaborator server");
        });
    });

    Ok(rx.recv()?)
}

fn stub_router() -> Router {
    async fn yes() -> Json<bool> {
        Json(true)
    }
    async fn ok() {}

    Router::new()
        .route("/api/users/:id/exists", get(yes))
        .route("/api/surveys/:id/exists", get(yes))
        .route("/api/users/:id/assign-to-department", post(ok))
        .route("/api/users/:id/assign-to-team", post(ok))
        .route("/api/users/:id/remove-from-department", delete(ok))
        .route("/api/users/:id/remove-from-team", delete(ok))
}
