use crate::{
    auth::AdminSession,
    db,
    error::AppError,
    models::{self, Booking, BookingStatus, Settings},
    state::AppState,
    validate::BookingPayload,
};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;

#[derive(Deserialize)]
pub struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct AdminUser {
    email: String,
    role: &'static str,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    message: &'static str,
    user: AdminUser,
}

pub async fn admin_login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    // The attempt budget is spent before credentials are examined.
    if !state.login_limiter.allow(addr.ip()) {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    if payload.email == state.config.admin_email && payload.password == state.config.admin_password
    {
        Ok(Json(LoginResponse {
            token: state.tokens.issue(),
            message: "Login successful",
            user: AdminUser {
                email: state.config.admin_email.clone(),
                role: "admin",
            },
        }))
    } else {
        Err(AppError::Unauthorized("Invalid email or password".to_string()))
    }
}

/// Public guest submission. The new request supersedes any live booking for
/// the same email, then must clear conflict detection against approved stays.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingPayload>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let new = payload.into_new_booking(true)?;
    let (booking, superseded) = db::create_booking(&state.pool, &new, BookingStatus::Pending).await?;

    for old in &superseded {
        state.notifier.booking_superseded(old, false);
    }
    state.notifier.request_received(&booking);
    state.notifier.admin_new_request(&booking);

    Ok((StatusCode::CREATED, Json(booking)))
}

#[derive(Deserialize)]
pub struct AdminBookingPayload {
    #[serde(flatten)]
    booking: BookingPayload,
    status: Option<String>,
}

/// Admin direct entry: defaults to approved, may omit the check-out date for
/// a single-day hold, and skips the guest-facing confirmation mails.
pub async fn admin_create_booking(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<AdminBookingPayload>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let status = match payload.status.as_deref() {
        None => BookingStatus::Approved,
        Some(s) => match BookingStatus::parse(s) {
            // Rejected is an API signal, never a stored state.
            Some(BookingStatus::Rejected) | None => {
                return Err(AppError::BadRequest("Invalid status".to_string()));
            }
            Some(status) => status,
        },
    };

    let new = payload.booking.into_new_booking(false)?;
    let (booking, superseded) = db::create_booking(&state.pool, &new, status).await?;

    for old in &superseded {
        state.notifier.booking_superseded(old, true);
    }

    Ok((StatusCode::CREATED, Json(booking)))
}

/// All bookings, newest first. A failed read degrades to an empty list so
/// the admin dashboard stays available.
pub async fn list_bookings(_admin: AdminSession, State(state): State<AppState>) -> Json<Vec<Booking>> {
    match db::list_bookings(&state.pool).await {
        Ok(bookings) => Json(bookings),
        Err(e) => {
            tracing::warn!(error = ?e, "booking list read failed; returning empty result");
            Json(Vec::new())
        }
    }
}

#[derive(Deserialize)]
pub struct StatusPayload {
    status: String,
}

pub async fn update_booking_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response, AppError> {
    let status = BookingStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;

    let booking = db::find_booking(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if status == BookingStatus::Rejected {
        db::delete_booking(&state.pool, &id).await?;
        state.notifier.booking_declined(&booking);
        return Ok(Json(json!({ "message": "Booking rejected and deleted successfully" }))
            .into_response());
    }

    // Approval turns a request into a hold, so it must clear conflict
    // detection like an insert would.
    if status == BookingStatus::Approved {
        let approved = db::approved_bookings(&state.pool).await?;
        if models::has_conflict(&approved, booking.check_in, booking.stay_end(), Some(&id)) {
            return Err(AppError::Conflict("Dates are not available".to_string()));
        }
    }

    let updated = db::update_status(&state.pool, &id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    match status {
        BookingStatus::Approved => state.notifier.booking_approved(&updated),
        BookingStatus::Cancelled => state.notifier.booking_cancelled(&updated),
        _ => {}
    }

    Ok(Json(updated).into_response())
}

/// Full field replacement with the same validation and conflict rules as
/// creation; the lifecycle status is preserved.
pub async fn replace_booking(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingPayload>,
) -> Result<Json<Booking>, AppError> {
    let new = payload.into_new_booking(false)?;

    db::find_booking(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let approved = db::approved_bookings(&state.pool).await?;
    let stay_end = new.check_out.unwrap_or(new.check_in);
    if models::has_conflict(&approved, new.check_in, stay_end, Some(&id)) {
        return Err(AppError::Conflict("Dates are not available".to_string()));
    }

    let updated = db::replace_booking(&state.pool, &id, &new)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    state.notifier.booking_modified(&updated);
    Ok(Json(updated))
}

pub async fn delete_booking(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = db::find_booking(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    db::delete_booking(&state.pool, &id).await?;
    state.notifier.booking_cancelled(&booking);

    Ok(Json(json!({ "message": "Booking deleted successfully" })))
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Calendar dates covered by approved stays in the requested range
/// (defaults: today through six months out). Read failures degrade to an
/// empty calendar to keep the widget rendering.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Json<serde_json::Value> {
    let today = Utc::now().date_naive();
    let start = query.start.unwrap_or(today);
    let end = query
        .end
        .unwrap_or_else(|| today.checked_add_months(Months::new(6)).unwrap_or(today));

    let booked = match db::approved_bookings(&state.pool).await {
        Ok(bookings) => models::booked_dates(&bookings, start, end),
        Err(e) => {
            tracing::warn!(error = ?e, "availability read failed; returning empty result");
            Vec::new()
        }
    };

    Json(json!({ "bookedDates": booked }))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    match db::get_settings(&state.pool).await {
        Ok(settings) => Json(settings),
        Err(e) => {
            tracing::warn!(error = ?e, "settings read failed; returning defaults");
            Json(Settings::default())
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}
