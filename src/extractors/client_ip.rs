//! Client address for rate limiting. The socket peer by default; proxy headers only
//! when `trust_proxy_headers` is set.

use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::net::SocketAddr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIp(pub String);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `X-Real-IP` as set by the proxy, else the last `X-Forwarded-For` hop (the one the
/// proxy appended; earlier hops are whatever the client sent).
fn from_proxy_headers(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-real-ip").map(str::to_string).or_else(|| {
        header_str(headers, "x-forwarded-for")
            .and_then(|v| v.rsplit(',').map(str::trim).find(|s| !s.is_empty()))
            .map(str::to_string)
    })
}

pub(crate) fn resolve_client(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy_headers: bool) -> String {
    let forwarded = if trust_proxy_headers {
        from_proxy_headers(headers)
    } else {
        None
    };
    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".into())
}

#[async_trait]
impl FromRequestParts<AppState> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(resolve_client(&parts.headers, peer, state.settings.trust_proxy_headers)))
    }
}
