use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{LoginRateLimiter, TokenStore};
use crate::config::AppConfig;
use crate::mailer::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenStore>,
    pub login_limiter: Arc<LoginRateLimiter>,
    pub notifier: Notifier,
}
