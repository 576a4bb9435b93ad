//! Booking payloads exchanged with the API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::SecureString;

/// A booking, as sent on create/update and returned on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Guest first name.
    pub firstname: String,
    /// Guest last name.
    pub lastname: String,
    /// Price of the stay, a signed 32-bit integer on the wire.
    pub totalprice: i32,
    /// Whether the deposit is paid.
    pub depositpaid: bool,
    /// Stay dates.
    pub bookingdates: BookingDates,
    /// Free-form extras, omitted from the payload when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Stay dates, serialized as `yyyy-MM-dd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    /// Arrival date.
    pub checkin: NaiveDate,
    /// Departure date.
    pub checkout: NaiveDate,
}

/// Response of `POST /booking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBooking {
    /// Server-assigned identifier.
    pub bookingid: i64,
    /// The booking as stored.
    pub booking: Booking,
}

/// One entry of `GET /booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingRef {
    /// Identifier of a matching booking.
    pub bookingid: i64,
}

/// Body of `POST /auth`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account name.
    pub username: &'a str,
    /// Account password, in clear.
    pub password: &'a str,
}

/// Response of `POST /auth`: a token, or the reason why none was issued.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// The issued token.
    #[serde(default)]
    pub token: Option<SecureString>,
    /// Why the login was refused.
    #[serde(default)]
    pub reason: Option<String>,
}
