use crate::error::AppError;
use crate::models::{self, Booking, BookingStatus, Settings};
use crate::validate::NewBooking;
use chrono::Utc;
use nanoid::nanoid;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn list_bookings(pool: &SqlitePool) -> Result<Vec<Booking>, AppError> {
    sqlx::query_as("SELECT * FROM bookings ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find_booking(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Booking>, AppError> {
    sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Live (pending or approved) bookings for an email, matched
/// case-insensitively.
pub async fn active_bookings_for_email(
    executor: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<Vec<Booking>, AppError> {
    sqlx::query_as(
        "SELECT * FROM bookings \
         WHERE LOWER(email) = LOWER(?) AND status IN ('pending', 'approved')",
    )
    .bind(email)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn approved_bookings(
    executor: impl SqliteExecutor<'_>,
) -> Result<Vec<Booking>, AppError> {
    sqlx::query_as("SELECT * FROM bookings WHERE status = 'approved'")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Insert a new booking, superseding any live booking held by the same
/// email and refusing dates already taken by an approved stay. The whole
/// read-check-write cycle runs in one transaction; returns the inserted
/// booking and the records it superseded (for notification after commit).
pub async fn create_booking(
    pool: &SqlitePool,
    new: &NewBooking,
    status: BookingStatus,
) -> Result<(Booking, Vec<Booking>), AppError> {
    let mut tx = pool.begin().await?;

    let superseded = active_bookings_for_email(&mut *tx, &new.email).await?;
    for old in &superseded {
        delete_booking(&mut *tx, &old.id).await?;
    }

    let approved = approved_bookings(&mut *tx).await?;
    let stay_end = new.check_out.unwrap_or(new.check_in);
    if models::has_conflict(&approved, new.check_in, stay_end, None) {
        return Err(AppError::Conflict("Dates are not available".to_string()));
    }

    let booking: Booking = sqlx::query_as(
        "INSERT INTO bookings \
         (id, name, email, phone, check_in, check_out, guests, message, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(nanoid!(10))
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(new.check_in)
    .bind(new.check_out)
    .bind(new.guests)
    .bind(&new.message)
    .bind(status)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((booking, superseded))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: BookingStatus,
) -> Result<Option<Booking>, AppError> {
    sqlx::query_as("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ? RETURNING *")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

/// Full field replacement for an admin edit; status is left untouched.
pub async fn replace_booking(
    pool: &SqlitePool,
    id: &str,
    new: &NewBooking,
) -> Result<Option<Booking>, AppError> {
    sqlx::query_as(
        "UPDATE bookings SET \
         name = ?, email = ?, phone = ?, check_in = ?, check_out = ?, \
         guests = ?, message = ?, updated_at = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(new.check_in)
    .bind(new.check_out)
    .bind(new.guests)
    .bind(&new.message)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)
}

pub async fn delete_booking(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_settings(pool: &SqlitePool) -> Result<Settings, AppError> {
    sqlx::query_as(
        "SELECT cottage_name, price_per_night, weekend_price, min_stay, \
         contact_phone, contact_email FROM settings WHERE id = 1",
    )
    .fetch_one(pool)
    .await
    .map_err(AppError::from)
}
