// handlers/protected/crud.rs - the CRUD quintet shared by every resource
//
// Each handler is generic over the entity descriptor and is mounted once per
// resource in `app::resource_routes`.

use axum::extract::State;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::{Entity, Page, PartialUpdate};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::extract::{Pagination, PathId, QueryParams, ValidJson};
use crate::middleware::{ApiResponse, ApiResult};

/// Filter type for listings that accept no filters
#[derive(Debug, Default, Deserialize)]
pub struct NoFilters {}

impl From<NoFilters> for FilterData {
    fn from(_: NoFilters) -> Self {
        FilterData::new()
    }
}

/// POST /<resource>
pub async fn create<E: Entity>(State(state): State<AppState>, ValidJson(body): ValidJson<E>) -> ApiResult<Value> {
    let id = state.db.create_entity(&body).await.map_err(ApiError::from_write)?;

    Ok(ApiResponse::created(json!({ "id": id })).with_message(format!("{} created successfully", E::LABEL)))
}

/// GET /<resource> - filtered, paginated listing with total count
pub async fn list<E, F>(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<F>,
    QueryParams(page): QueryParams<Pagination>,
) -> ApiResult<Page<E::Row>>
where
    E: Entity,
    F: DeserializeOwned + Into<FilterData> + Send + 'static,
{
    let (skip, limit) = page.resolve(&state.config.pagination)?;
    let filters: FilterData = filters.into();

    let page = state.db.find_entities::<E>(&filters, skip, limit).await?;
    Ok(ApiResponse::success(page))
}

/// GET /<resource>/{id}
pub async fn get<E: Entity>(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<E::Row> {
    let row = state.db.find_entity_by_id::<E>(id).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /<resource>/{id} - full replace with the create schema
pub async fn replace<E: Entity>(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(body): ValidJson<E>,
) -> ApiResult<Value> {
    state.db.update_entity(id, &body).await.map_err(ApiError::from_write)?;

    Ok(ApiResponse::success(json!({ "id": id })).with_message(format!("{} updated successfully", E::LABEL)))
}

/// PATCH /<resource>/{id} - sparse update, at least one field required
pub async fn patch<P: PartialUpdate>(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(body): ValidJson<P>,
) -> ApiResult<Value> {
    state.db.update_partial(id, &body).await.map_err(ApiError::from_write)?;

    Ok(ApiResponse::success(json!({ "id": id }))
        .with_message(format!("{} updated successfully", <P::Target as Entity>::LABEL)))
}

/// DELETE /<resource>/{id}
pub async fn delete<E: Entity>(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<()> {
    state.db.delete_entity::<E>(id).await.map_err(ApiError::from_write)?;

    Ok(ApiResponse::message(format!("{} deleted successfully", E::LABEL)))
}
