pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod state;
pub mod validate;

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use state::AppState;
use std::str::FromStr;
use tower_http::cors::{Any, CorsLayer};

/// Opens the SQLite database, creates the schema if needed, and seeds the
/// settings singleton with the cottage defaults.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            check_in DATE NOT NULL,
            check_out DATE,
            guests INTEGER NOT NULL DEFAULT 1,
            message TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP
        );",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            cottage_name TEXT NOT NULL,
            price_per_night INTEGER NOT NULL,
            weekend_price INTEGER NOT NULL,
            min_stay INTEGER NOT NULL,
            contact_phone TEXT NOT NULL,
            contact_email TEXT NOT NULL
        );",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO settings \
         (id, cottage_name, price_per_night, weekend_price, min_stay, contact_phone, contact_email) \
         VALUES (1, 'Sand Lake Lodge', 250, 300, 3, '416-832-9144', 'info@sandlakelodge.com')",
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/availability", get(handlers::get_availability))
        .route(
            "/api/bookings",
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route(
            "/api/bookings/{id}",
            patch(handlers::update_booking_status)
                .put(handlers::replace_booking)
                .delete(handlers::delete_booking),
        )
        .route("/api/admin/login", post(handlers::admin_login))
        .route(
            "/api/admin/bookings",
            get(handlers::list_bookings).post(handlers::admin_create_booking),
        )
        .layer(cors)
        .with_state(state)
}
