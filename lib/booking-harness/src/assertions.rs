//! Field-by-field booking comparisons.
//!
//! Every booking field is listed in [`BookingField`], so a comparison reports
//! all the differing fields at once instead of stopping at the first one.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::Booking;

/// A comparable booking field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BookingField {
    /// Guest first name.
    #[display("firstname")]
    Firstname,
    /// Guest last name.
    #[display("lastname")]
    Lastname,
    /// Price of the stay.
    #[display("totalprice")]
    Totalprice,
    /// Whether the deposit is paid.
    #[display("depositpaid")]
    Depositpaid,
    /// Arrival date.
    #[display("bookingdates.checkin")]
    Checkin,
    /// Departure date.
    #[display("bookingdates.checkout")]
    Checkout,
    /// Free-form extras, optional.
    #[display("additionalneeds")]
    Additionalneeds,
}

impl BookingField {
    /// Every field, in payload order.
    pub const ALL: [Self; 7] = [
        Self::Firstname,
        Self::Lastname,
        Self::Totalprice,
        Self::Depositpaid,
        Self::Checkin,
        Self::Checkout,
        Self::Additionalneeds,
    ];

    /// Reads this field of `booking` as JSON.
    #[must_use]
    pub fn value(self, booking: &Booking) -> Value {
        match self {
            Self::Firstname => json!(booking.firstname),
            Self::Lastname => json!(booking.lastname),
            Self::Totalprice => json!(booking.totalprice),
            Self::Depositpaid => json!(booking.depositpaid),
            Self::Checkin => json!(booking.bookingdates.checkin),
            Self::Checkout => json!(booking.bookingdates.checkout),
            Self::Additionalneeds => json!(booking.additionalneeds),
        }
    }
}

/// One differing field.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[display("{field}: expected {expected}, got {actual}")]
pub struct FieldMismatch {
    /// The compared field.
    pub field: BookingField,
    /// Its expected value.
    pub expected: Value,
    /// Its actual value.
    pub actual: Value,
}

/// The bookings differ on at least one field.
#[derive(Debug, Clone, PartialEq, derive_more::Error)]
pub struct AssertionError {
    /// The differing fields, in payload order.
    pub mismatches: Vec<FieldMismatch>,
}

impl AssertionError {
    /// The differing field names.
    pub fn fields(&self) -> impl Iterator<Item = BookingField> + '_ {
        self.mismatches.iter().map(|mismatch| mismatch.field)
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} booking field(s) differ", self.mismatches.len())?;
        for mismatch in &self.mismatches {
            write!(f, "\n  - {mismatch}")?;
        }
        Ok(())
    }
}

/// The values a partial update is expected to have set.
///
/// Fields left to `None` are expected unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingUpdates {
    firstname: Option<String>,
    lastname: Option<String>,
    totalprice: Option<i32>,
    depositpaid: Option<bool>,
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
    additionalneeds: Option<Option<String>>,
}

impl BookingUpdates {
    /// Expects `firstname` to be set.
    #[must_use]
    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    /// Expects `lastname` to be set.
    #[must_use]
    pub fn with_lastname(mut self, lastname: impl Into<String>) -> Self {
        self.lastname = Some(lastname.into());
        self
    }

    /// Expects `totalprice` to be set.
    #[must_use]
    pub fn with_totalprice(mut self, totalprice: i32) -> Self {
        self.totalprice = Some(totalprice);
        self
    }

    /// Expects `depositpaid` to be set.
    #[must_use]
    pub fn with_depositpaid(mut self, depositpaid: bool) -> Self {
        self.depositpaid = Some(depositpaid);
        self
    }

    /// Expects the checkin date to be set.
    #[must_use]
    pub fn with_checkin(mut self, checkin: NaiveDate) -> Self {
        self.checkin = Some(checkin);
        self
    }

    /// Expects the checkout date to be set.
    #[must_use]
    pub fn with_checkout(mut self, checkout: NaiveDate) -> Self {
        self.checkout = Some(checkout);
        self
    }

    /// `None` expects the field to be cleared.
    #[must_use]
    pub fn with_additionalneeds(mut self, additionalneeds: Option<String>) -> Self {
        self.additionalneeds = Some(additionalneeds);
        self
    }

    /// The expected value of `field`, if this update sets it.
    #[must_use]
    pub fn expected(&self, field: BookingField) -> Option<Value> {
        match field {
            BookingField::Firstname => self.firstname.as_ref().map(|it| json!(it)),
            BookingField::Lastname => self.lastname.as_ref().map(|it| json!(it)),
            BookingField::Totalprice => self.totalprice.map(|it| json!(it)),
            BookingField::Depositpaid => self.depositpaid.map(|it| json!(it)),
            BookingField::Checkin => self.checkin.map(|it| json!(it)),
            BookingField::Checkout => self.checkout.map(|it| json!(it)),
            BookingField::Additionalneeds => self.additionalneeds.as_ref().map(|it| json!(it)),
        }
    }
}

fn compare(
    fields: impl IntoIterator<Item = BookingField>,
    expected: impl Fn(BookingField) -> Value,
    actual: &Booking,
) -> Result<(), AssertionError> {
    let mismatches = fields
        .into_iter()
        .filter_map(|field| {
            let expected = expected(field);
            let actual = field.value(actual);
            (expected != actual).then_some(FieldMismatch {
                field,
                expected,
                actual,
            })
        })
        .collect::<Vec<_>>();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(AssertionError { mismatches })
    }
}

/// Checks that every field outside `skip` kept its original value.
///
/// # Errors
///
/// Returns an [`AssertionError`] listing the changed fields.
pub fn assert_fields_unchanged(
    original: &Booking,
    updated: &Booking,
    skip: &[BookingField],
) -> Result<(), AssertionError> {
    let fields = BookingField::ALL
        .into_iter()
        .filter(|field| !skip.contains(field));
    compare(fields, |field| field.value(original), updated)
}

/// Checks that two bookings are equal, field by field.
///
/// # Errors
///
/// Returns an [`AssertionError`] listing the differing fields.
pub fn assert_booking_matches(expected: &Booking, actual: &Booking) -> Result<(), AssertionError> {
    assert_fields_unchanged(expected, actual, &[])
}

/// Checks a partially updated booking: fields set by `updates` have their new
/// value, every other field its `original` value.
///
/// # Errors
///
/// Returns an [`AssertionError`] listing the unexpected fields.
pub fn assert_booking_fields(
    actual: &Booking,
    original: &Booking,
    updates: &BookingUpdates,
) -> Result<(), AssertionError> {
    compare(
        BookingField::ALL,
        |field| {
            updates
                .expected(field)
                .unwrap_or_else(|| field.value(original))
        },
        actual,
    )
}
