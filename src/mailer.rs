//! Outbound guest/admin notifications. Dispatch is fire-and-forget: the
//! sink logs the message, and a failed or slow send can never fail the
//! request that triggered it.

use tracing::info;

use crate::models::Booking;

#[derive(Clone)]
pub struct Notifier {
    admin_email: String,
}

impl Notifier {
    pub fn new(admin_email: String) -> Self {
        Self { admin_email }
    }

    fn dispatch(&self, to: &str, subject: &str, body: String) {
        let to = to.to_string();
        let subject = subject.to_string();
        tokio::spawn(async move {
            info!(%to, %subject, "email dispatched: {body}");
        });
    }

    pub fn request_received(&self, booking: &Booking) {
        self.dispatch(
            &booking.email,
            "Booking Request Received",
            format!(
                "Dear {}, thank you for your booking request for {} ({} guest(s)). \
                 We will review it and contact you within 24 hours.",
                booking.name,
                stay(booking),
                booking.guests
            ),
        );
    }

    pub fn admin_new_request(&self, booking: &Booking) {
        let mut body = format!(
            "New booking request from {} <{}> for {} ({} guest(s)).",
            booking.name,
            booking.email,
            stay(booking),
            booking.guests
        );
        if !booking.message.is_empty() {
            body.push_str(&format!(" Message: {}", booking.message));
        }
        self.dispatch(&self.admin_email, "New Booking Request", body);
    }

    /// Sent to the owner of a live booking that a newer submission for the
    /// same email has replaced. The admin channel uses slightly different
    /// wording but applies the same rule.
    pub fn booking_superseded(&self, booking: &Booking, via_admin: bool) {
        let reason = if via_admin {
            "a new booking has been created for your email address"
        } else {
            "you have submitted a new booking request"
        };
        self.dispatch(
            &booking.email,
            "Previous Booking Request Cancelled",
            format!(
                "Dear {}, your previous booking request for {} (status: {}) has been \
                 automatically cancelled because {}. Only one active booking request \
                 per guest is allowed at a time.",
                booking.name,
                stay(booking),
                booking.status.as_str(),
                reason
            ),
        );
    }

    pub fn booking_approved(&self, booking: &Booking) {
        self.dispatch(
            &booking.email,
            "Booking Confirmed",
            format!(
                "Dear {}, your booking for {} has been approved. We will contact you \
                 shortly with payment details and arrival instructions.",
                booking.name,
                stay(booking)
            ),
        );
    }

    pub fn booking_cancelled(&self, booking: &Booking) {
        self.dispatch(
            &booking.email,
            "Booking Cancelled",
            format!(
                "Your booking has been cancelled: {} for {}.",
                booking.name,
                stay(booking)
            ),
        );
    }

    pub fn booking_declined(&self, booking: &Booking) {
        self.dispatch(
            &booking.email,
            "Booking Declined",
            format!(
                "Your booking request has been declined: {} for {}.",
                booking.name,
                stay(booking)
            ),
        );
    }

    pub fn booking_modified(&self, booking: &Booking) {
        self.dispatch(
            &booking.email,
            "Booking Modified",
            format!(
                "Your booking has been modified: {} for {}.",
                booking.name,
                stay(booking)
            ),
        );
    }
}

fn stay(booking: &Booking) -> String {
    match booking.check_out {
        Some(out) => format!("{} to {}", booking.check_in, out),
        None => booking.check_in.to_string(),
    }
}
