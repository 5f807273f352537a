// Handlers behind `middleware::require_auth`: whitelisted address or bearer token.
pub mod blogs;
pub mod clients;
pub mod crud;
