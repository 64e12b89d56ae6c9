#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use recipes_api::config::AppConfig;
use recipes_api::database::{Database, MemoryDatabase};
use recipes_api::session::MemorySessionStore;
use recipes_api::{app, AppState};

pub struct TestServer {
    pub base_url: String,
    pub db: Arc<MemoryDatabase>,
    pub sessions: Arc<MemorySessionStore>,
    pub upload_dir: PathBuf,
    pub cookie_name: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A client that keeps the session cookie between requests
    pub fn client(&self) -> Result<Client> {
        Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")
    }

    /// Register, then log in; the returned client carries an authenticated session
    pub async fn login_as(&self, username: &str) -> Result<Client> {
        let client = self.client()?;
        let res = client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "secret-password"
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": "secret-password" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        Ok(client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Boot the real router on an ephemeral port against fresh in-memory stores
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|_| {}).await
}

/// Like `spawn_server`, but `configure` may swap parts of the state before the router is built
pub async fn spawn_server_with<F>(configure: F) -> Result<TestServer>
where
    F: FnOnce(&mut AppState),
{
    let upload_dir = std::env::temp_dir().join(format!("recipes-api-test-{}", uuid::Uuid::new_v4().simple()));
    let config = AppConfig::testing(&upload_dir);
    let cookie_name = config.session.cookie_name.clone();

    let db = Arc::new(MemoryDatabase::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let mut state = AppState::new(config, Database::Memory(db.clone()), sessions.clone());
    configure(&mut state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app(state)).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        db,
        sessions,
        upload_dir,
        cookie_name,
    })
}

pub async fn create_ingredient(server: &TestServer, client: &Client, name: &str, unit: &str) -> Result<i64> {
    let res = client
        .post(server.url("/ingredient/create"))
        .json(&json!({ "name": name, "unit": unit }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create ingredient failed: {}", res.status());
    let body: Value = res.json().await?;
    body["id"].as_i64().context("response had no id")
}

pub async fn create_recipe(server: &TestServer, client: &Client, name: &str, ingredient_ids: &[i64]) -> Result<i64> {
    let ingredients: Vec<Value> = ingredient_ids
        .iter()
        .map(|id| json!({ "id": id, "amount": "1 cup" }))
        .collect();
    let res = client
        .post(server.url("/recipe/create"))
        .json(&json!({ "name": name, "ingredients": ingredients, "steps": ["mix", "bake"] }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create recipe failed: {}", res.status());
    let body: Value = res.json().await?;
    body["id"].as_i64().context("response had no id")
}
