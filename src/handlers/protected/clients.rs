// handlers/protected/clients.rs - API client management under /auth/clients

use axum::{extract::State, Extension};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{hash_secret, TokenKind};
use crate::database::models::{Client, ClientCreate, NewClient};
use crate::database::Page;
use crate::error::ApiError;
use crate::handlers::extract::{Pagination, PathId, QueryParams, ValidJson};
use crate::middleware::{ApiResponse, ApiResult, Caller};

/// POST /auth/clients - register a client; the secret is stored hashed
pub async fn create(State(state): State<AppState>, ValidJson(body): ValidJson<ClientCreate>) -> ApiResult<Value> {
    let new_client = NewClient {
        client_id: body.client_id,
        client_secret_hash: hash_secret(&body.client_secret)?,
        name: body.name,
    };

    let id = state.db.create_client(&new_client).await.map_err(ApiError::from_write)?;
    info!(client_id = %new_client.client_id, "registered API client");

    Ok(ApiResponse::created(json!({
        "id": id,
        "client_id": new_client.client_id,
        "name": new_client.name,
    }))
    .with_message("Client created successfully"))
}

/// GET /auth/clients
pub async fn list(State(state): State<AppState>, QueryParams(page): QueryParams<Pagination>) -> ApiResult<Page<Client>> {
    let (skip, limit) = page.resolve(&state.config.pagination)?;
    let page = state.db.list_clients(skip, limit).await?;
    Ok(ApiResponse::success(page))
}

/// PATCH /auth/clients/{id}/deactivate
///
/// A client token may not deactivate the client it was issued to.
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    PathId(id): PathId,
) -> ApiResult<Value> {
    let client = state.db.find_entity_by_id::<NewClient>(id).await?;

    if let Some(claims) = caller.claims() {
        if claims.kind == TokenKind::Client && claims.sub == client.client_id {
            warn!(client_id = %client.client_id, "client attempted to deactivate itself");
            return Err(ApiError::forbidden("Cannot deactivate your own client"));
        }
    }

    state.db.deactivate_client(id).await.map_err(ApiError::from_write)?;
    info!(client_id = %client.client_id, "deactivated API client");

    Ok(ApiResponse::success(json!({ "id": id, "client_id": client.client_id, "is_active": false }))
        .with_message("Client deactivated successfully"))
}
