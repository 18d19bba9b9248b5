use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, ResponseError,
};
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{error::LibraryServerError, state::AppState};

/// Sliding-window counter of failed attempts keyed by client address.
/// A `max_failures` of 0 disables throttling.
#[derive(Clone)]
pub struct RateLimiter {
    failures: Arc<DashMap<IpAddr, Vec<Instant>>>,
    max_failures: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            failures: Arc::new(DashMap::new()),
            max_failures,
            window,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_failures > 0
    }

    /// True once `ip` has used up its failures for the current window.
    pub fn is_limited(&self, ip: IpAddr) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let now = Instant::now();
        match self.failures.get_mut(&ip) {
            Some(mut entry) => {
                entry.retain(|&timestamp| now.duration_since(timestamp) < self.window);
                entry.len() >= self.max_failures
            }
            None => false,
        }
    }

    pub fn record_failure(&self, ip: IpAddr) {
        if !self.is_enabled() {
            return;
        }

        let now = Instant::now();
        let mut entry = self.failures.entry(ip).or_default();
        entry.retain(|&timestamp| now.duration_since(timestamp) < self.window);
        entry.push(now);
    }

    /// Forgets earlier failures, e.g. after a successful login.
    pub fn reset(&self, ip: IpAddr) {
        self.failures.remove(&ip);
    }

    pub fn cleanup_old_entries(&self) {
        let now = Instant::now();

        self.failures.retain(|_, timestamps| {
            timestamps.retain(|&timestamp| now.duration_since(timestamp) < self.window);
            !timestamps.is_empty()
        });
    }

    pub fn tracked_addresses(&self) -> usize {
        self.failures.len()
    }
}

/// Turns away login attempts from a peer address that has run out of
/// failures. The login handler records the failures. Requests with no known
/// peer address (in-process test requests) are let through.
pub async fn rate_limit_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let throttled = match (req.peer_addr(), req.app_data::<web::Data<AppState>>()) {
        (Some(peer_addr), Some(state)) => {
            let ip = peer_addr.ip();
            if state.login_limiter.is_limited(ip) {
                log::warn!("Rate limit exceeded for IP: {}", ip);
                state.logs.append(format!("Login throttled for {}", ip));
                true
            } else {
                false
            }
        }
        _ => false,
    };

    if throttled {
        let response = LibraryServerError::RateLimitExceeded.error_response();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
