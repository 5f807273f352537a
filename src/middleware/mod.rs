pub mod auth;
pub mod response;

pub use auth::{require_auth, Caller};
pub use response::{ApiResponse, ApiResult};
