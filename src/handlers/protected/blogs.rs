// handlers/protected/blogs.rs - blog extras on top of the CRUD quintet

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Blog, BlogCreate, BlogSearch, PublishQuery};
use crate::database::Page;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::extract::{Pagination, PathId, QueryParams};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /blogs/search?title&author&tags&published&skip&limit
///
/// Text parameters match partially, `published` matches exactly.
pub async fn search(
    State(state): State<AppState>,
    QueryParams(search): QueryParams<BlogSearch>,
    QueryParams(page): QueryParams<Pagination>,
) -> ApiResult<Page<Blog>> {
    let (skip, limit) = page.resolve(&state.config.pagination)?;
    let filters: FilterData = search.into();

    let page = state.db.find_entities::<BlogCreate>(&filters, skip, limit).await?;
    Ok(ApiResponse::success(page))
}

/// PATCH /blogs/{id}/publish?publish=<bool>
pub async fn publish(
    State(state): State<AppState>,
    PathId(id): PathId,
    QueryParams(query): QueryParams<PublishQuery>,
) -> ApiResult<Value> {
    state.db.set_published(id, query.publish).await.map_err(ApiError::from_write)?;

    let message = if query.publish {
        "Blog published successfully"
    } else {
        "Blog unpublished successfully"
    };
    Ok(ApiResponse::success(json!({ "id": id, "published": query.publish })).with_message(message))
}
