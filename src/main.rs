use std::net::SocketAddr;
use std::sync::Arc;

use cottage_booking::auth::{LoginRateLimiter, TokenStore};
use cottage_booking::config::AppConfig;
use cottage_booking::mailer::Notifier;
use cottage_booking::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();

    let pool = cottage_booking::init_db(&config.database_url)
        .await
        .expect("failed to initialize database");

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        pool,
        tokens: Arc::new(TokenStore::new()),
        login_limiter: Arc::new(LoginRateLimiter::new()),
        notifier: Notifier::new(config.admin_email.clone()),
        config: Arc::new(config),
    };

    let app = cottage_booking::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");
    info!("listening on {addr}");
    // ConnectInfo feeds the peer address to the login rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
