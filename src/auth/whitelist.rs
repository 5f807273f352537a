use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolve the caller's address. With `trust_forwarded_for` the first
/// parseable `X-Forwarded-For` entry wins over the socket peer.
pub fn client_ip(peer: SocketAddr, headers: &HeaderMap, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    canonical(peer.ip())
}

/// Exact membership. IPv4-mapped IPv6 peers compare as IPv4.
pub fn is_whitelisted(ip: IpAddr, whitelist: &[IpAddr]) -> bool {
    let ip = canonical(ip);
    whitelist.iter().any(|allowed| canonical(*allowed) == ip)
}

fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}
