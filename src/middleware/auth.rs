use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::{self, Claims};
use crate::error::ApiError;

/// How the current request got past the gate; inserted as a request extension
#[derive(Clone, Debug)]
pub enum Caller {
    Whitelisted(IpAddr),
    Token(Claims),
}

impl Caller {
    /// Subject of the bearer token, if the caller presented one
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Caller::Token(claims) => Some(claims),
            Caller::Whitelisted(_) => None,
        }
    }
}

/// Admit whitelisted addresses outright, otherwise require a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config;
    let ip = auth::client_ip(peer, &headers, config.server.trust_forwarded_for);

    let caller = if auth::is_whitelisted(ip, &config.security.whitelisted_ips) {
        debug!(%ip, "whitelisted address admitted");
        Caller::Whitelisted(ip)
    } else {
        let verified = auth::bearer_token(&headers).and_then(|token| auth::validate_jwt(token, &config.security));
        match verified {
            Ok(claims) => Caller::Token(claims),
            Err(e) => {
                warn!(%ip, path = %request.uri().path(), "rejected request: {}", e);
                return ApiError::from(e).into_response();
            }
        }
    };

    request.extensions_mut().insert(caller);
    next.run(request).await
}
