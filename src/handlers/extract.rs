//! Request extractors that reject with the API's JSON error body instead of
//! axum's plain-text rejections.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::error::ApiError;
use crate::validation::Validate;

/// JSON body that has been deserialized and passed [`Validate`]
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        // Well-formed JSON with missing or mistyped fields
        JsonRejection::JsonDataError(e) => ApiError::invalid_field("body", e.body_text()),
        JsonRejection::JsonSyntaxError(e) => ApiError::invalid_json(e.body_text()),
        JsonRejection::MissingJsonContentType(e) => ApiError::bad_request(e.body_text()),
        other => ApiError::bad_request(other.body_text()),
    }
}

/// Query string parameters; malformed values are a 422
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| ApiError::invalid_field("query", e.body_text()))?;
        Ok(Self(value))
    }
}

/// Numeric `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| ApiError::invalid_field("id", e.body_text()))?;
        Ok(Self(id))
    }
}

/// `skip` / `limit` as they arrive on the query string
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Apply defaults and bounds: `skip >= 0`, `1 <= limit <= max_limit`
    pub fn resolve(&self, config: &PaginationConfig) -> Result<(i64, i64), ApiError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(config.default_limit);

        if skip < 0 {
            return Err(ApiError::invalid_field("skip", "must be greater than or equal to 0"));
        }
        if limit < 1 || limit > config.max_limit {
            return Err(ApiError::invalid_field(
                "limit",
                format!("must be between 1 and {}", config.max_limit),
            ));
        }
        Ok((skip, limit))
    }
}
