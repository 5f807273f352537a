pub mod password;
pub mod whitelist;

use std::str::FromStr;

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_secret, verify_secret};
pub use whitelist::{client_ip, is_whitelisted};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Misconfigured(String),

    #[error("JWT generation error: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

/// Who a token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    User,
    Client,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username or client_id
    pub sub: String,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, kind: TokenKind, email: Option<String>, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::minutes(security.access_token_expire_minutes)).timestamp();

        Self {
            sub: sub.into(),
            kind,
            email,
            iat: now.timestamp(),
            exp,
        }
    }
}

/// Only the HMAC family is usable with a shared `SECRET_KEY`
fn algorithm(security: &SecurityConfig) -> Result<Algorithm, AuthError> {
    let alg = Algorithm::from_str(security.algorithm.trim())
        .map_err(|_| AuthError::Misconfigured(format!("Unknown JWT algorithm '{}'", security.algorithm)))?;
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(alg),
        other => Err(AuthError::Misconfigured(format!(
            "JWT algorithm {:?} needs a key pair, only HS256/HS384/HS512 are supported",
            other
        ))),
    }
}

fn secret(security: &SecurityConfig) -> Result<&[u8], AuthError> {
    if security.secret_key.is_empty() {
        return Err(AuthError::Misconfigured("SECRET_KEY is not configured".to_string()));
    }
    Ok(security.secret_key.as_bytes())
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    let header = Header::new(algorithm(security)?);
    let encoding_key = EncodingKey::from_secret(secret(security)?);

    encode(&header, claims, &encoding_key).map_err(AuthError::Signing)
}

/// Check signature and expiry and return the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret(security)?);
    let mut validation = Validation::new(algorithm(security)?);
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => {
                tracing::debug!("Rejected token: {}", e);
                AuthError::InvalidToken
            }
        })
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
