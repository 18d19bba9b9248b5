use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};

const TOKEN_BYTES: usize = 32;

/// In-memory bearer tokens for the admin session.
///
/// Tokens are opaque and mapped to an absolute expiry. They are dropped on
/// revoke, on the first validation after expiry, by [`cleanup_expired`], or
/// when the map is full and room is needed for a new token. Nothing survives
/// a restart.
///
/// [`cleanup_expired`]: SessionManager::cleanup_expired
#[derive(Clone)]
pub struct SessionManager {
    // token -> expires_at
    tokens: Arc<DashMap<String, DateTime<Utc>>>,
    ttl: Duration,
    max_sessions: usize,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    pub fn new(ttl: std::time::Duration, max_sessions: usize) -> Self {
        Self::with_clock(ttl, max_sessions, Arc::new(SystemClock))
    }

    pub fn with_clock(
        ttl: std::time::Duration,
        max_sessions: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
            max_sessions: max_sessions.max(1),
            clock,
        }
    }

    pub fn create(&self) -> String {
        if self.tokens.len() >= self.max_sessions {
            self.make_room();
        }

        let token = generate_token();
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.tokens.insert(token.clone(), expires_at);
        log::debug!("Created session token expiring at {}", expires_at);

        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let now = self.clock.now();

        let expires_at = match self.tokens.get(token) {
            Some(entry) => *entry.value(),
            None => return false,
        };

        if now < expires_at {
            return true;
        }

        self.tokens.remove_if(token, |_, expiry| *expiry <= now);
        log::debug!("Dropped expired session token");
        false
    }

    pub fn revoke(&self, token: &str) {
        if self.tokens.remove(token).is_some() {
            log::debug!("Revoked session token");
        }
    }

    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.tokens.retain(|_, expires_at| {
            if *expires_at <= now {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            log::info!("Cleaned up {} expired sessions", removed);
        }

        removed
    }

    pub fn active_count(&self) -> usize {
        self.tokens.len()
    }

    #[cfg(test)]
    fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    fn make_room(&self) {
        self.cleanup_expired();

        while self.tokens.len() >= self.max_sessions {
            let oldest = self
                .tokens
                .iter()
                .min_by_key(|entry| *entry.value())
                .map(|entry| entry.key().clone());

            match oldest {
                Some(token) => {
                    self.tokens.remove(&token);
                    log::warn!("Session capacity reached, evicted the oldest session");
                }
                None => break,
            }
        }
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
