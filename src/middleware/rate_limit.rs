// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-window rate limiting per client IP.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the current window resets
    pub reset_after: u64,
}

/// Counts requests per IP in fixed windows.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    hits: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            hits: DashMap::new(),
        }
    }

    /// Count a request from `ip` at `now`.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> RateDecision {
        let mut entry = self.hits.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        entry.count = entry.count.saturating_add(1);
        let elapsed = now.duration_since(entry.started);
        let reset_after = self.window.saturating_sub(elapsed).as_secs();

        RateDecision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after,
        }
    }

    pub fn check(&self, ip: IpAddr) -> RateDecision {
        self.check_at(ip, Instant::now())
    }

    /// Drop windows that have ended. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.hits.len();
        self.hits
            .retain(|_, window| now.duration_since(window.started) < self.window);
        before - self.hits.len()
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Client address as seen by the outermost trusted proxy.
///
/// Each of the `trusted_hops` proxies appends the address it received the
/// request from, so the client is the `trusted_hops`-th entry from the right.
/// Entries further left are supplied by the client and ignored. Falls back to
/// the socket peer when proxies are not trusted or the header is unusable.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trusted_hops: usize) -> IpAddr {
    let forwarded = (trusted_hops > 0)
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|h| h.to_str().ok())
        .and_then(|value| {
            let hops: Vec<&str> = value.split(',').map(str::trim).collect();
            let index = hops.len().saturating_sub(trusted_hops);
            hops.get(index).and_then(|hop| hop.parse().ok())
        });

    forwarded
        .or_else(|| peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware that rejects clients exceeding the configured rate.
pub async fn rate_limit(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer, state.config.trust_proxy_hops);
    let decision = state.rate_limiter.check(ip);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
        let mut response = AppError::RateLimited.into_response();
        response
            .headers_mut()
            .insert("retry-after", HeaderValue::from(decision.reset_after));
        response
    };

    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(decision.reset_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_limit_per_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        let start = Instant::now();

        assert!(limiter.check_at(ip(1), start).allowed);
        let second = limiter.check_at(ip(1), start);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check_at(ip(1), start + Duration::from_secs(10));
        assert!(!third.allowed);
        assert_eq!(third.reset_after, 50);

        // other clients are unaffected
        assert!(limiter.check_at(ip(2), start).allowed);

        // a new window starts once the old one has elapsed
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(60)).allowed);
    }

    #[test]
    fn test_client_ip_uses_trusted_hop() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.168.1.5:4000".parse().unwrap();
        let addr = |s: &str| s.parse::<IpAddr>().unwrap();
        assert_eq!(client_ip(&headers, Some(peer), 1), peer.ip());

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(client_ip(&headers, Some(peer), 1), addr("203.0.113.7"));

        // Leftmost entries come from the client
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4, 203.0.113.7"));
        assert_eq!(client_ip(&headers, Some(peer), 1), addr("203.0.113.7"));
        assert_eq!(client_ip(&headers, Some(peer), 2), addr("1.2.3.4"));
        assert_eq!(client_ip(&headers, Some(peer), 5), addr("1.2.3.4"));
        assert_eq!(client_ip(&headers, Some(peer), 0), peer.ip());

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert_eq!(client_ip(&headers, Some(peer), 1), peer.ip());
        assert_eq!(client_ip(&headers, None, 1), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_purge_expired() {
        let limiter = RateLimiter::new(Duration::from_millis(0), 5);
        limiter.check(ip(1));
        limiter.check(ip(2));
        assert_eq!(limiter.purge_expired(), 2);
    }
}
