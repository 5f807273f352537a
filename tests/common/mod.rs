#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const SECRET_KEY: &str = "integration-test-secret";

/// A server process owned by one test; killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn the built binary with test defaults plus `envs` overrides.
    /// The database points at a closed port so nothing needs MySQL.
    pub async fn start(envs: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_portfolio-api"));
        cmd.env_remove("DATABASE_URL")
            .env("ENVIRONMENT", "development")
            .env("PORT", port.to_string())
            .env("SECRET_KEY", SECRET_KEY)
            .env("HOST", "127.0.0.1")
            .env("DB_PORT", "1")
            .env("DATABASE_CONNECT_TIMEOUT_SECS", "2")
            .env("WHITELISTED_IPS", "")
            .env("RUST_LOG", "portfolio_api=warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        for (key, value) in envs {
            cmd.env(key, value);
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;
        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
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
    }
}

/// Token signed with the secret the test server runs with
pub fn user_token(sub: &str) -> String {
    use portfolio_api::auth::{generate_jwt, Claims, TokenKind};
    use portfolio_api::config::AppConfig;

    let mut security = AppConfig::development().security;
    security.secret_key = SECRET_KEY.to_string();
    let claims = Claims::new(sub, TokenKind::User, None, &security);
    generate_jwt(&claims, &security).expect("sign test token")
}
