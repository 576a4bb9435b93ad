//! Date offsets used to build booking payloads relative to today.

use chrono::{Days, Local, NaiveDate};

/// `yyyy-MM-dd`, the wire format of booking dates.
pub const ISO_LOCAL_DATE: &str = "%Y-%m-%d";

/// `dd-MM-yyyy`, used to exercise date validation.
pub const US_DAY_FIRST: &str = "%d-%m-%Y";

/// The current local date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Shifts `base` by `days` (negative goes back in time).
///
/// Saturates at the bounds of [`NaiveDate`].
#[must_use]
pub fn adjust_date_to_local_date(base: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        base.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        base.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Shifts `base` by `days` and formats it with a `chrono` format string.
#[must_use]
pub fn adjust_date(base: NaiveDate, days: i64, format: &str) -> String {
    adjust_date_to_local_date(base, days)
        .format(format)
        .to_string()
}
