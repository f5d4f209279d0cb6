use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::{PoisonError, RwLock};

use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::error::{AppError, AppResult};

/// Identifiers tracked before idle entries are pruned
pub const MAX_TRACKED_IDENTIFIERS: usize = 512;

/// Per-identifier limit on login attempts, independent of client IP.
///
/// Memory stays bounded: once `max_tracked` identifiers are held, entries
/// whose budget has fully refilled are dropped. If every entry is still
/// active the limiter starts over empty.
pub struct LoginThrottle {
    quota: Quota,
    max_tracked: usize,
    limiter: RwLock<DefaultKeyedRateLimiter<String>>,
}

impl LoginThrottle {
    pub fn per_minute(attempts: u32) -> Self {
        Self::with_capacity(attempts, MAX_TRACKED_IDENTIFIERS)
    }

    pub fn with_capacity(attempts: u32, max_tracked: usize) -> Self {
        let attempts = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(attempts);
        Self {
            quota,
            max_tracked: max_tracked.max(1),
            limiter: RwLock::new(RateLimiter::keyed(quota)),
        }
    }

    pub fn check(&self, identifier: &str) -> AppResult<()> {
        let key = identifier.trim().to_lowercase();
        self.prune_if_full();

        let limiter = self.limiter.read().unwrap_or_else(PoisonError::into_inner);
        limiter.check_key(&key).map_err(|_| {
            tracing::warn!(identifier = %key, "Login attempts throttled");
            AppError::TooManyRequests(
                "Too many login attempts. Please wait a minute and try again.".to_string(),
            )
        })
    }

    /// Number of identifiers currently held
    pub fn tracked(&self) -> usize {
        self.limiter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn prune_if_full(&self) {
        if self.tracked() < self.max_tracked {
            return;
        }

        let mut limiter = self.limiter.write().unwrap_or_else(PoisonError::into_inner);
        if limiter.len() < self.max_tracked {
            return;
        }

        limiter.retain_recent();
        limiter.shrink_to_fit();
        if limiter.len() >= self.max_tracked {
            tracing::warn!(
                tracked = limiter.len(),
                "Login throttle full of active identifiers, starting over"
            );
            *limiter = RateLimiter::keyed(self.quota);
        }
    }
}

/// Log request and response details with the peer address
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!(
        client_ip = %addr.ip(),
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            "RATE LIMITED - Request rejected due to too many requests"
        );
    } else if status.is_client_error() || status.is_server_error() {
        tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %status,
            "Request failed"
        );
    } else {
        tracing::debug!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %status,
            "Request completed"
        );
    }

    response
}
