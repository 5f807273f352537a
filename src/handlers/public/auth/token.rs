// handlers/public/auth/token.rs - POST /auth/token

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{self, AuthError, Claims, TokenKind};
use crate::database::models::TokenRequest;
use crate::error::ApiError;
use crate::handlers::extract::ValidJson;

/// Exchange API user credentials for a bearer token.
///
/// Input: `{"api_user": {"username", "email", "password"}}`
/// Output: `{"success": true, "message", "token"}`
pub async fn user_token(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let credentials = body.api_user;

    let user = state.db.find_user(&credentials.username).await?;
    let user = match user {
        Some(user) if auth::verify_secret(&credentials.password, &user.password) => user,
        _ => {
            warn!(username = %credentials.username, "failed login");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let claims = Claims::new(&user.username, TokenKind::User, Some(user.email), &state.config.security);
    let token = auth::generate_jwt(&claims, &state.config.security)?;
    info!(username = %user.username, "issued user token");

    Ok(Json(json!({
        "success": true,
        "message": "Token generated successfully",
        "token": token,
    })))
}
