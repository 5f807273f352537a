// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::filter::FilterError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity (well-formed JSON that breaks field rules)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity { message, field_errors } => {
                json!({
                    "success": false,
                    "error": true,
                    "message": message,
                    "code": "UNPROCESSABLE_ENTITY",
                    "field_errors": field_errors
                })
            }
            _ => {
                json!({
                    "success": false,
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors,
        }
    }

    /// Single-field 422, used for query string problems
    pub fn invalid_field(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), problem.into());
        ApiError::unprocessable_entity("Request validation failed", field_errors)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Database failure during a create/update/delete: the driver message goes
    /// back to the caller as a 400.
    pub fn from_write(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(e) => {
                tracing::error!("Write failed: {}", e);
                ApiError::bad_request(e.to_string())
            }
            DatabaseError::Connection(e) => {
                tracing::error!("Write failed, database unreachable: {}", e);
                ApiError::bad_request(format!("Could not connect to the database: {}", e))
            }
            DatabaseError::ConnectTimeout(_) | DatabaseError::InvalidDatabaseUrl(_) => {
                tracing::error!("Write failed: {}", err);
                ApiError::bad_request(err.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::NoFieldsToUpdate => ApiError::bad_request("No fields to update"),
            FilterError::InvalidLimit(msg) => ApiError::invalid_field("limit", msg),
            FilterError::InvalidOffset(msg) => ApiError::invalid_field("skip", msg),
            FilterError::UnknownField(field) => ApiError::bad_request(format!("Unknown filter field '{}'", field)),
            FilterError::InvalidTableName(name) => {
                tracing::error!("Refusing to query invalid table name '{}'", name);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

/// Read-path mapping: anything the driver reports is a 500
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Duplicate(msg) => ApiError::bad_request(msg),
            DatabaseError::Filter(e) => e.into(),
            DatabaseError::Connection(e) => {
                tracing::error!("Database unreachable: {}", e);
                ApiError::internal_server_error("Database connection failed")
            }
            DatabaseError::ConnectTimeout(secs) => {
                tracing::error!("Database connect timed out after {}s", secs);
                ApiError::internal_server_error("Database connection failed")
            }
            DatabaseError::InvalidDatabaseUrl(msg) => {
                tracing::error!("Invalid database URL: {}", msg);
                ApiError::internal_server_error("Database is not configured")
            }
            DatabaseError::Sqlx(e) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("SQLx error: {}", e);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(e) => {
                tracing::error!("Token signing failed: {}", e);
                ApiError::internal_server_error("Could not issue token")
            }
            AuthError::Misconfigured(msg) => {
                tracing::error!("Token configuration error: {}", msg);
                ApiError::internal_server_error("Authentication is not configured")
            }
            AuthError::Hashing(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal_server_error("Could not hash secret")
            }
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
