//! Client IP resolution for public rate-limit keys.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Placeholder used when neither headers nor the socket reveal an address.
pub const UNKNOWN_IP: &str = "unknown";

/// Determines the client IP used to key public rate limits.
///
/// Proxy headers are only trusted when `behind_proxy` is set; otherwise any
/// client could choose its own bucket. Header precedence is
/// `CF-Connecting-IP`, the first `X-Forwarded-For` entry, then `X-Real-IP`.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(resolve_client_ip(&headers, None, true), "203.0.113.7");
/// assert_eq!(resolve_client_ip(&headers, None, false), "unknown");
/// ```
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip;
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "cf-connecting-ip")
        .or_else(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|xff| xff.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(str::to_string)
}
