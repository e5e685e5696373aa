//! Input validation for booking submissions. Malformed input is rejected
//! before it reaches the store; no partial application.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    #[validate(length(min = 1, message = "Missing required field: name"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub check_in: String,
    pub check_out: Option<String>,
    #[validate(range(min = 1, max = 8, message = "Number of guests must be between 1 and 8"))]
    pub guests: Option<i64>,
    pub message: Option<String>,
}

/// A booking payload that passed validation, with dates parsed and
/// defaults applied.
#[derive(Debug)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: Option<NaiveDate>,
    pub guests: i64,
    pub message: String,
}

impl BookingPayload {
    /// Guest submissions must carry a check-out date; admin direct entries
    /// may omit it for single-day holds.
    pub fn into_new_booking(self, check_out_required: bool) -> Result<NewBooking, AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(first_message(&e)))?;

        if let Some(phone) = self.phone.as_deref() {
            if !phone_is_valid(phone) {
                return Err(AppError::BadRequest("Invalid phone number format".to_string()));
            }
        }

        let check_in = parse_date(&self.check_in, "check-in")?;
        let check_out = match self.check_out.as_deref() {
            Some(s) => Some(parse_date(s, "check-out")?),
            None if check_out_required => {
                return Err(AppError::BadRequest(
                    "Missing required field: checkOut".to_string(),
                ));
            }
            None => None,
        };

        if let Some(out) = check_out {
            if out <= check_in {
                return Err(AppError::BadRequest(
                    "Check-out date must be after check-in date".to_string(),
                ));
            }
        }

        Ok(NewBooking {
            name: self.name,
            email: self.email,
            phone: self.phone,
            check_in,
            check_out,
            guests: self.guests.unwrap_or(1),
            message: self.message.unwrap_or_default(),
        })
    }
}

fn parse_date(s: &str, label: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid {label} date")))
}

/// Permissive international phone check: after stripping separators, an
/// optional `+` followed by a leading digit 1-9 and at most 16 digits total.
fn phone_is_valid(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    !digits.is_empty()
        && digits.len() <= 16
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref())
        .next()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid input".to_string())
}
