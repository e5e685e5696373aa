use std::net::IpAddr;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use dashmap::DashMap;
use nanoid::nanoid;

use crate::error::AppError;
use crate::state::AppState;

const TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);
const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Server-side store of issued admin bearer tokens. Tokens are opaque
/// nanoids with a fixed TTL; expired entries are dropped on lookup.
pub struct TokenStore {
    tokens: DashMap<String, Instant>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::with_ttl(TOKEN_TTL)
    }

    fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    pub fn issue(&self) -> String {
        let token = nanoid!(32);
        self.tokens.insert(token.clone(), Instant::now() + self.ttl);
        token
    }

    pub fn verify(&self, token: &str) -> bool {
        let expired = match self.tokens.get(token) {
            None => return false,
            Some(expiry) => Instant::now() >= *expiry,
        };
        if expired {
            self.tokens.remove(token);
        }
        !expired
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

struct AttemptWindow {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window login rate limiter keyed by caller address: at most
/// `MAX_LOGIN_ATTEMPTS` attempts per window, counted before credentials
/// are examined.
pub struct LoginRateLimiter {
    attempts: DashMap<IpAddr, AttemptWindow>,
    window: Duration,
    max_attempts: u32,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(RATE_LIMIT_WINDOW, MAX_LOGIN_ATTEMPTS)
    }

    fn with_limits(window: Duration, max_attempts: u32) -> Self {
        Self {
            attempts: DashMap::new(),
            window,
            max_attempts,
        }
    }

    /// Records an attempt and reports whether it is within budget.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut entry = self.attempts.entry(ip).or_insert_with(|| AttemptWindow {
            count: 0,
            reset_at: now + self.window,
        });
        if now > entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }
        if entry.count >= self.max_attempts {
            return false;
        }
        entry.count += 1;
        true
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extractor guarding admin endpoints. Missing bearer header is 401;
/// an unknown or expired token is 403.
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

        if !state.tokens.verify(token) {
            return Err(AppError::Forbidden("Invalid or expired token".to_string()));
        }
        Ok(AdminSession)
    }
}
