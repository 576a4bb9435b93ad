use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Identifier assigned on creation, never reused
pub type BookingId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i32,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

impl Booking {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        let BookingDates { checkin, checkout } = self.bookingdates;
        if checkin >= checkout {
            return Err(ApiError::bad_request(format!(
                "checkin {checkin} must be before checkout {checkout}"
            )));
        }
        Ok(())
    }
}

/// Partial update, absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchBooking {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub totalprice: Option<i32>,
    #[serde(default)]
    pub depositpaid: Option<bool>,
    #[serde(default)]
    pub bookingdates: Option<PatchDates>,
    #[serde(default)]
    pub additionalneeds: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDates {
    #[serde(default)]
    pub checkin: Option<NaiveDate>,
    #[serde(default)]
    pub checkout: Option<NaiveDate>,
}

impl PatchBooking {
    /// Merge into `booking`, the result is validated before being returned.
    pub(crate) fn apply(self, booking: &Booking) -> Result<Booking, ApiError> {
        let mut result = booking.clone();
        if let Some(firstname) = self.firstname {
            result.firstname = firstname;
        }
        if let Some(lastname) = self.lastname {
            result.lastname = lastname;
        }
        if let Some(totalprice) = self.totalprice {
            result.totalprice = totalprice;
        }
        if let Some(depositpaid) = self.depositpaid {
            result.depositpaid = depositpaid;
        }
        if let Some(dates) = self.bookingdates {
            if let Some(checkin) = dates.checkin {
                result.bookingdates.checkin = checkin;
            }
            if let Some(checkout) = dates.checkout {
                result.bookingdates.checkout = checkout;
            }
        }
        if let Some(additionalneeds) = self.additionalneeds {
            result.additionalneeds = Some(additionalneeds);
        }

        result.validate()?;
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedBooking {
    pub bookingid: BookingId,
    pub booking: Booking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingRef {
    pub bookingid: BookingId,
}

/// `GET /booking` query.
///
/// Every given constraint must hold, repeated parameters included.
/// Unknown parameters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    firstnames: Vec<String>,
    lastnames: Vec<String>,
    checkins: Vec<NaiveDate>,
    checkouts: Vec<NaiveDate>,
}

impl BookingFilter {
    pub(crate) fn parse(query: Option<&str>) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or_default())
            .map_err(|err| ApiError::bad_request(err.to_string()))?;

        let mut result = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "firstname" => result.firstnames.push(value),
                "lastname" => result.lastnames.push(value),
                "checkin" => result.checkins.push(parse_date(&key, &value)?),
                "checkout" => result.checkouts.push(parse_date(&key, &value)?),
                _ => {}
            }
        }
        Ok(result)
    }

    pub(crate) fn matches(&self, booking: &Booking) -> bool {
        let BookingDates { checkin, checkout } = booking.bookingdates;

        self.firstnames.iter().all(|name| *name == booking.firstname)
            && self.lastnames.iter().all(|name| *name == booking.lastname)
            && self.checkins.iter().all(|date| checkin >= *date)
            && self.checkouts.iter().all(|date| checkout <= *date)
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| ApiError::bad_request(format!("{key} '{value}': {err}")))
}
