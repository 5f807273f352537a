// handlers/public/auth/client_token.rs - POST /auth/client-token

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{self, Claims, TokenKind};
use crate::database::models::ClientTokenRequest;
use crate::error::ApiError;
use crate::handlers::extract::ValidJson;

/// Client-credentials flow.
///
/// Output: `{"access_token", "token_type": "bearer", "expires_in"}`
pub async fn client_token(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ClientTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let client = state.db.find_client(&body.client_id).await?;
    let client = match client {
        Some(client) if client.is_active && auth::verify_secret(&body.client_secret, &client.client_secret_hash) => {
            client
        }
        Some(client) if !client.is_active => {
            warn!(client_id = %body.client_id, "token requested for inactive client");
            return Err(ApiError::unauthorized("Invalid client credentials"));
        }
        _ => {
            warn!(client_id = %body.client_id, "invalid client credentials");
            return Err(ApiError::unauthorized("Invalid client credentials"));
        }
    };

    let security = &state.config.security;
    let claims = Claims::new(&client.client_id, TokenKind::Client, None, security);
    let token = auth::generate_jwt(&claims, security)?;
    info!(client_id = %client.client_id, "issued client token");

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": security.access_token_expire_minutes * 60,
    })))
}
