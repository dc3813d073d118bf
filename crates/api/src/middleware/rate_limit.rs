//! Per-client rate limiting for the guest register and login routes.
//!
//! Clients are keyed by the peer IP address. When `trust_forwarded_for` is
//! set the last `X-Forwarded-For` hop is used instead, since that is the one
//! appended by the fronting proxy.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovRateLimiter,
};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_rate_limited;

type ClientRateLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Key used when the connection carries no peer address (in-process callers).
const UNKNOWN_PEER: &str = "unknown-peer";

/// Stale client entries are dropped every this many checks.
const PRUNE_EVERY: u64 = 1024;

/// Rate limiter shared across all requests.
pub struct RateLimiterState {
    limiter: ClientRateLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
    checks: AtomicU64,
}

impl RateLimiterState {
    /// `None` when the limit is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: GovRateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
            checks: AtomicU64::new(0),
        })
    }

    /// `Err(retry_after_secs)` when the client is over its quota.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % PRUNE_EVERY == 0 {
            self.prune();
        }

        match self.limiter.check_key(&client.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(self.clock.now()).as_secs().max(1)),
        }
    }

    /// Drops clients whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(tracked_clients = self.limiter.len(), "Pruned rate limiter state");
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Client key for rate limiting.
pub fn client_key(req: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(hop) = forwarded {
            return hop.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_PEER.to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref limiter) = state.rate_limiter {
        let client = client_key(&req, state.config.security.trust_forwarded_for);
        if let Err(retry_after) = limiter.check(&client) {
            record_rate_limited();
            tracing::warn!(
                client = %client,
                path = %req.uri().path(),
                retry_after_secs = retry_after,
                "Rate limit exceeded"
            );
            return ApiError::RateLimited(retry_after).into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(peer: Option<&str>, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/guests/demo/login");
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(addr) = peer {
            req.extensions_mut()
                .insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
        }
        req
    }

    #[test]
    fn test_zero_disables_limiter() {
        assert!(RateLimiterState::new(0).is_none());
        assert!(RateLimiterState::new(5).is_some());
    }

    #[test]
    fn test_limit_is_per_client() {
        let state = RateLimiterState::new(2).unwrap();
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());

        let retry_after = state.check("10.0.0.1").unwrap_err();
        assert!(retry_after >= 1);

        assert!(state.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        let req = request(Some("198.51.100.7:40000"), Some("203.0.113.9"));
        assert_eq!(client_key(&req, false), "198.51.100.7");
    }

    #[test]
    fn test_client_key_ignores_peer_port() {
        let a = request(Some("198.51.100.7:40000"), None);
        let b = request(Some("198.51.100.7:40001"), None);
        assert_eq!(client_key(&a, false), client_key(&b, false));
    }

    #[test]
    fn test_client_key_uses_last_hop_when_trusted() {
        let req = request(Some("10.0.0.1:5000"), Some("6.6.6.6, 203.0.113.9"));
        assert_eq!(client_key(&req, true), "203.0.113.9");

        // trusted but absent header falls back to the peer
        let req = request(Some("10.0.0.1:5000"), Some("  "));
        assert_eq!(client_key(&req, true), "10.0.0.1");
    }

    #[test]
    fn test_client_key_without_peer() {
        assert_eq!(client_key(&request(None, None), false), UNKNOWN_PEER);
    }

    #[test]
    fn test_rotating_forwarded_for_does_not_add_quota() {
        let state = RateLimiterState::new(1).unwrap();

        let first = request(Some("198.51.100.7:40000"), Some("1.1.1.1"));
        assert!(state.check(&client_key(&first, false)).is_ok());

        for i in 2..10 {
            let spoofed = format!("1.1.1.{}", i);
            let req = request(Some("198.51.100.7:40000"), Some(&spoofed));
            assert!(state.check(&client_key(&req, false)).is_err());
        }

        assert_eq!(state.tracked_clients(), 1);
    }

    #[test]
    fn test_prune_keeps_throttled_clients() {
        let state = RateLimiterState::new(1).unwrap();
        state.check("10.0.0.1").ok();
        state.prune();
        assert_eq!(state.tracked_clients(), 1);
        assert!(state.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_periodic_prune_runs_inside_check() {
        let state = RateLimiterState::new(1).unwrap();
        for _ in 0..PRUNE_EVERY + 1 {
            state.check("10.0.0.1").ok();
        }
        assert_eq!(state.tracked_clients(), 1);
    }

    #[test]
    fn test_debug_does_not_panic() {
        let state = RateLimiterState::new(10).unwrap();
        state.check("a").ok();
        assert!(format!("{:?}", state).contains("tracked_clients"));
    }
}
