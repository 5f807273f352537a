use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{param, Entity};
use crate::error::ApiError;
use crate::filter::{FieldMappings, SqlResult};
use crate::validation::{FieldErrors, Validate};

/// API client allowed to obtain tokens with its own credentials
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret_hash: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /auth/clients`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCreate {
    pub client_id: String,
    pub client_secret: String,
    pub name: String,
}

/// Body of `POST /auth/client-token`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientTokenRequest {
    pub client_id: String,
    pub client_secret: String,
}

impl Validate for ClientTokenRequest {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("client_id", &self.client_id, 1, None)
            .length("client_secret", &self.client_secret, 1, None)
            .finish()
    }
}

/// Row about to be inserted; the secret is already hashed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub client_id: String,
    pub client_secret_hash: String,
    pub name: String,
}

impl Validate for ClientCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("client_id", &self.client_id, 5, Some(100))
            .length("client_secret", &self.client_secret, 10, Some(100))
            .length("name", &self.name, 2, Some(100))
            .finish()
    }
}

impl Validate for NewClient {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("client_id", &self.client_id, 5, Some(100))
            .length("name", &self.name, 2, Some(100))
            .finish()
    }
}

impl Entity for NewClient {
    type Row = Client;
    const LABEL: &'static str = "Client";

    fn table_name() -> &'static str {
        "clients"
    }

    fn field_mappings() -> FieldMappings {
        &[("client_id", "client_id"), ("name", "name"), ("is_active", "is_active")]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO clients (client_id, client_secret_hash, name, is_active, created_at) \
             VALUES (?, ?, ?, TRUE, CURRENT_TIMESTAMP)",
            vec![param(&self.client_id), param(&self.client_secret_hash), param(&self.name)],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE clients SET client_id = ?, client_secret_hash = ?, name = ? WHERE id = ?",
            vec![param(&self.client_id), param(&self.client_secret_hash), param(&self.name), param(&id)],
        )
    }
}

/// Exact lookup used by the client-credentials token flow
pub fn select_by_client_id_query(client_id: &str) -> SqlResult {
    SqlResult::new("SELECT * FROM clients WHERE client_id = ?", vec![param(&client_id)])
}

pub fn deactivate_query(id: i64) -> SqlResult {
    SqlResult::new("UPDATE clients SET is_active = FALSE WHERE id = ?", vec![param(&id)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn secret_hash_is_not_serialized() {
        let client = Client {
            id: 1,
            client_id: "frontend".to_string(),
            client_secret_hash: "$2b$04$not-a-real-hash".to_string(),
            name: "Frontend".to_string(),
            is_active: true,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("client_secret_hash").is_none());
        assert_eq!(json["client_id"], "frontend");
    }

    #[test]
    fn client_create_bounds() {
        let body = ClientCreate {
            client_id: "abc".to_string(),
            client_secret: "short".to_string(),
            name: "X".to_string(),
        };
        match body.validate().unwrap_err() {
            ApiError::UnprocessableEntity { field_errors, .. } => assert_eq!(field_errors.len(), 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
