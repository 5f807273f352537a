pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod validation;

pub use app::{app, AppState};
pub use error::ApiError;

/// `RUST_LOG` wins; otherwise info for this crate and the HTTP trace layer
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("portfolio_api=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
