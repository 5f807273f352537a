// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service banner, health probe and token acquisition.

pub mod auth;

use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Portfolio API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Portfolio and blog REST API",
            "endpoints": {
                "health": "/health (public)",
                "auth": "/auth/token, /auth/client-token (public - token acquisition)",
                "clients": "/auth/clients (protected)",
                "portfolio": "/companies, /technologies, /experiences, /projects, /project-tasks, /responsibilities (protected)",
                "relationships": "/company-experiences, /technology-experiences, /technology-projects (protected)",
                "blogs": "/blogs, /blogs/search, /blogs/{id}/publish (protected)",
            }
        }
    }))
}

/// GET /health - liveness only, never touches the database
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
