#![allow(clippy::missing_errors_doc, dead_code)]
use std::path::PathBuf;

use anyhow::Context;
use http::StatusCode;
use serde_json::Value;

use booking_harness::dates::{adjust_date_to_local_date, today};
use booking_harness::endpoints::{BOOKING_BASE, BOOKING_BY_ID, PARAM_ID};
use booking_harness::fixtures::load_booking_requests;
use booking_harness::{Booking, BookingDates, BookingRef, CreatedBooking};

use super::TestApp;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_bookings() -> Vec<Booking> {
    load_booking_requests(fixture_path("bookingData.json")).expect("valid fixture")
}

pub fn single_booking() -> Booking {
    load_booking_requests(fixture_path("bookingData_single.json"))
        .expect("valid fixture")
        .into_iter()
        .next()
        .expect("one booking")
}

/// A booking whose dates are offsets from today
pub fn booking_request(
    firstname: &str,
    lastname: &str,
    totalprice: i32,
    additionalneeds: Option<&str>,
    checkin_days: i64,
    checkout_days: i64,
) -> Booking {
    let today = today();
    Booking {
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        totalprice,
        depositpaid: true,
        bookingdates: BookingDates {
            checkin: adjust_date_to_local_date(today, checkin_days),
            checkout: adjust_date_to_local_date(today, checkout_days),
        },
        additionalneeds: additionalneeds.map(ToString::to_string),
    }
}

pub fn default_booking() -> Booking {
    booking_request("John", "Doe", 100, Some("Breakfast"), -5, 5)
}

/// The JSON document of `booking`, reshaped by `edit`
pub fn booking_json(booking: &Booking, edit: impl FnOnce(&mut Value)) -> String {
    let mut value = serde_json::to_value(booking).expect("serializable booking");
    edit(&mut value);
    value.to_string()
}

/// Drop the field at `path`
pub fn remove_field(path: &'static [&'static str]) -> impl FnOnce(&mut Value) {
    move |value| {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let parent = parents
            .iter()
            .try_fold(value, |current, key| current.get_mut(*key));
        if let Some(Value::Object(map)) = parent {
            map.remove(*last);
        }
    }
}

/// Replace the value at `path`, the empty path is the whole document
pub fn set_field(path: &'static [&'static str], new_value: Value) -> impl FnOnce(&mut Value) {
    move |value| {
        if let Some(target) = path
            .iter()
            .try_fold(value, |current, key| current.get_mut(*key))
        {
            *target = new_value;
        }
    }
}

impl TestApp {
    pub async fn create_booking(&mut self, booking: &Booking) -> anyhow::Result<CreatedBooking> {
        let result = self
            .with_json_body(booking)?
            .post(BOOKING_BASE)
            .await
            .context("create booking")?
            .as_json()?;
        Ok(result)
    }

    pub async fn get_booking(&mut self, id: i64) -> anyhow::Result<Booking> {
        let result = self
            .with_path_param(PARAM_ID, id)
            .get(BOOKING_BY_ID)
            .await
            .context("get booking")?
            .as_json()?;
        Ok(result)
    }

    pub async fn assert_booking_gone(&mut self, id: i64) -> anyhow::Result<()> {
        self.with_path_param(PARAM_ID, id)
            .get(BOOKING_BY_ID)
            .expect_status(StatusCode::NOT_FOUND)
            .await
            .context("booking still exists")?;
        Ok(())
    }

    /// Ids returned by `GET /booking` for the given query
    pub async fn search(&mut self, query: &[(&str, &str)]) -> anyhow::Result<Vec<i64>> {
        for (name, value) in query {
            self.with_query_param(*name, *value);
        }
        let refs: Vec<BookingRef> = self
            .get(BOOKING_BASE)
            .await
            .context("search bookings")?
            .as_json()?;
        Ok(refs.into_iter().map(|found| found.bookingid).collect())
    }
}
