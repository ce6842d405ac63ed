#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use results_api::auth::{generate_jwt, Claims};
use results_api::config::{self, DEFAULT_ADMIN_ROLE};
use results_api::database::models::{NewUser, User};
use results_api::database::{MemoryStore, ResultStore};
use results_api::{app, AppState};

/// In-process server on its own port with a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: Client,
    pub admin: User,
    pub user: User,
    pub other: User,
}

impl TestServer {
    /// Seeds an administrator (id 1) and two plain users (ids 2 and 3)
    pub async fn spawn() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let admin = store
            .insert_user(NewUser::new(
                "admin@example.com",
                "admin",
                vec!["ROLE_USER".into(), DEFAULT_ADMIN_ROLE.into()],
            ))
            .await?;
        let user = store
            .insert_user(NewUser::new("user@example.com", "user", vec!["ROLE_USER".into()]))
            .await?;
        let other = store
            .insert_user(NewUser::new("other@example.com", "other", vec!["ROLE_USER".into()]))
            .await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let state = AppState::new(store.clone(), config::config().api.base_path.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: Client::new(),
            admin,
            user,
            other,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URL under the results base path, e.g. `results("/3.xml")`
    pub fn results(&self, rest: &str) -> String {
        format!("{}{}{}", self.base_url, config::config().api.base_path, rest)
    }

    pub fn base_path(&self) -> &'static str {
        &config::config().api.base_path
    }

    pub fn token_for(&self, user: &User) -> Result<String> {
        Ok(generate_jwt(&Claims::for_user(user))?)
    }

    pub fn as_user(&self, builder: RequestBuilder, user: &User) -> Result<RequestBuilder> {
        Ok(builder.bearer_auth(self.token_for(user)?))
    }

    /// POST a result as `actor`, returning its id
    pub async fn create(&self, actor: &User, score: i32, owner: i32) -> Result<i64> {
        let resp = self
            .as_user(self.client.post(self.results("")), actor)?
            .json(&serde_json::json!({ "result": score, "user": owner }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create failed: {}", resp.status());
        let body: Value = resp.json().await?;
        body["result"]["id"]
            .as_i64()
            .context("created result has no id")
    }
}

/// Assert the `{ code, message }` envelope of an error response
pub async fn assert_message(resp: reqwest::Response, code: u16) -> Result<Value> {
    assert_eq!(resp.status().as_u16(), code);
    let body: Value = resp.json().await?;
    assert_eq!(body["code"], code);
    assert!(body["message"].is_string());
    Ok(body)
}
