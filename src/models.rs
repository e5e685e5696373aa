use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::prelude::FromRow;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: Option<NaiveDate>,
    pub guests: i64,
    pub message: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Last day of the stay. Single-day admin entries have no check-out.
    pub fn stay_end(&self) -> NaiveDate {
        self.check_out.unwrap_or(self.check_in)
    }
}

#[derive(Debug, Clone, Default, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub cottage_name: String,
    pub price_per_night: i64,
    pub weekend_price: i64,
    pub min_stay: i64,
    pub contact_phone: String,
    pub contact_email: String,
}

/// Inclusive interval overlap: endpoints touching counts as a conflict.
fn ranges_overlap(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Whether the candidate range collides with an approved booking. Only
/// approved bookings hold dates; pending and cancelled records impose no
/// constraint. `exclude_id` skips the booking being edited or approved.
pub fn has_conflict(
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_id: Option<&str>,
) -> bool {
    bookings.iter().any(|b| {
        b.status == BookingStatus::Approved
            && exclude_id != Some(b.id.as_str())
            && ranges_overlap(check_in, check_out, b.check_in, b.stay_end())
    })
}

/// Distinct calendar dates covered by approved bookings, clipped to
/// `[start, end]`, in ascending order.
pub fn booked_dates(bookings: &[Booking], start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = BTreeSet::new();
    for booking in bookings.iter().filter(|b| b.status == BookingStatus::Approved) {
        let from = booking.check_in.max(start);
        let to = booking.stay_end().min(end);
        for day in from.iter_days().take_while(|d| d <= &to) {
            days.insert(day);
        }
    }
    days.into_iter().collect()
}
