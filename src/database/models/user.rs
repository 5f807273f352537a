use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::param;
use crate::error::ApiError;
use crate::filter::SqlResult;
use crate::validation::{FieldErrors, Validate};

/// Stored API user; `password` holds the bcrypt hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserInDb {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Credentials presented to `POST /auth/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub api_user: ApiUser,
}

impl Validate for TokenRequest {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("api_user.username", &self.api_user.username, 1, None)
            .length("api_user.password", &self.api_user.password, 1, None)
            .finish()
    }
}

pub fn find_user_query(username: &str) -> SqlResult {
    SqlResult::new(
        "SELECT username, email, password FROM users WHERE username = ?",
        vec![param(&username)],
    )
}

pub fn insert_user_query(username: &str, email: &str, password_hash: &str) -> SqlResult {
    SqlResult::new(
        "INSERT INTO users (username, email, password) VALUES (?, ?, ?)",
        vec![param(&username), param(&email), param(&password_hash)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_not_serialized() {
        let user = UserInDb {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "$2b$04$not-a-real-hash".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn token_request_needs_credentials() {
        let body: TokenRequest = serde_json::from_str(
            r#"{"api_user": {"username": "admin", "email": "admin@example.com", "password": ""}}"#,
        )
        .unwrap();
        assert!(body.validate().is_err());
    }
}
