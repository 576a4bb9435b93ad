#![allow(missing_docs)]

use http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use booking_harness::assertions::{BookingUpdates, assert_booking_fields};
use booking_harness::dates::{ISO_LOCAL_DATE, adjust_date, adjust_date_to_local_date};
use booking_harness::endpoints::{BOOKING_BY_ID, PARAM_ID};
use booking_harness::{Booking, CreatedBooking, SecureString};

mod common;
pub use self::common::*;

async fn patch(
    app: &mut TestApp,
    token: &SecureString,
    id: i64,
    body: &Value,
) -> anyhow::Result<Booking> {
    let result = app
        .with_token(token)
        .with_path_param(PARAM_ID, id)
        .with_json_body(body)?
        .patch(BOOKING_BY_ID)
        .await?
        .as_json()?;
    Ok(result)
}

#[rstest]
#[case::firstname(json!({"firstname": "Bond"}), BookingUpdates::default().with_firstname("Bond"))]
#[case::lastname(json!({"lastname": "Bond"}), BookingUpdates::default().with_lastname("Bond"))]
#[case::depositpaid(json!({"depositpaid": false}), BookingUpdates::default().with_depositpaid(false))]
#[case::totalprice(json!({"totalprice": 42}), BookingUpdates::default().with_totalprice(42))]
#[case::additionalneeds(
    json!({"additionalneeds": "Dinner"}),
    BookingUpdates::default().with_additionalneeds(Some("Dinner".to_string()))
)]
#[case::special_characters(
    json!({"firstname": "O'Connor<testing>", "lastname": "测试"}),
    BookingUpdates::default().with_firstname("O'Connor<testing>").with_lastname("测试")
)]
#[tokio::test]
async fn should_patch_only_given_fields(
    #[future] app: TestApp,
    #[case] body: Value,
    #[case] updates: BookingUpdates,
) -> anyhow::Result<()> {
    let mut app = app.await;
    let token = app.token().await?;
    let CreatedBooking { bookingid, booking } = app.create_booking(&single_booking()).await?;

    let patched = patch(&mut app, &token, bookingid, &body).await?;

    assert_booking_fields(&patched, &booking, &updates)?;
    Ok(())
}

#[rstest]
#[case::checkin(-5, 0)]
#[case::checkout(0, 5)]
#[case::both(-5, 5)]
#[tokio::test]
async fn should_patch_booking_dates(
    #[future] app: TestApp,
    #[case] checkin_days: i64,
    #[case] checkout_days: i64,
) -> anyhow::Result<()> {
    let mut app = app.await;
    let token = app.token().await?;
    let CreatedBooking { bookingid, booking } = app.create_booking(&single_booking()).await?;
    let dates = booking.bookingdates;
    let checkin = adjust_date_to_local_date(dates.checkin, checkin_days);
    let checkout = adjust_date_to_local_date(dates.checkout, checkout_days);

    let mut body = json!({});
    let mut updates = BookingUpdates::default();
    if checkin_days != 0 {
        body["bookingdates"]["checkin"] = json!(adjust_date(dates.checkin, checkin_days, ISO_LOCAL_DATE));
        updates = updates.with_checkin(checkin);
    }
    if checkout_days != 0 {
        body["bookingdates"]["checkout"] =
            json!(adjust_date(dates.checkout, checkout_days, ISO_LOCAL_DATE));
        updates = updates.with_checkout(checkout);
    }
    let patched = patch(&mut app, &token, bookingid, &body).await?;

    assert_booking_fields(&patched, &booking, &updates)?;
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_be_idempotent(#[future] app: TestApp) -> anyhow::Result<()> {
    let mut app = app.await;
    let token = app.token().await?;
    let CreatedBooking { bookingid, booking } = app.create_booking(&single_booking()).await?;
    let body = json!({"firstname": "Maestro"});
    let updates = BookingUpdates::default().with_firstname("Maestro");

    let first = patch(&mut app, &token, bookingid, &body).await?;
    let second = patch(&mut app, &token, bookingid, &body).await?;

    assert_booking_fields(&first, &booking, &updates)?;
    assert_booking_fields(&second, &booking, &updates)?;
    assert_eq!(first, second);
    Ok(())
}

#[rstest]
#[case::wrong_types(json!({"totalprice": "test", "firstname": 123_123}))]
#[case::unknown_field(json!({"address": "Rotterdam"}))]
#[case::inverted_dates(json!({"bookingdates": {"checkin": "2030-01-01"}}))]
#[tokio::test]
async fn should_reject_invalid_patch(
    #[future] app: TestApp,
    #[case] body: Value,
) -> anyhow::Result<()> {
    let mut app = app.await;
    let token = app.token().await?;
    let CreatedBooking { bookingid, booking } = app.create_booking(&single_booking()).await?;

    app.with_token(&token)
        .with_path_param(PARAM_ID, bookingid)
        .with_json_body(&body)?
        .patch(BOOKING_BY_ID)
        .expect_status(StatusCode::BAD_REQUEST)
        .await?;

    let stored = app.get_booking(bookingid).await?;
    assert_booking_fields(&stored, &booking, &BookingUpdates::default())?;
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_not_find_unknown_booking(#[future] app: TestApp) -> anyhow::Result<()> {
    let mut app = app.await;
    let token = app.token().await?;

    app.with_token(&token)
        .with_path_param(PARAM_ID, i32::MAX)
        .with_json_body(&json!({"firstname": "Maestro"}))?
        .patch(BOOKING_BY_ID)
        .expect_status(StatusCode::NOT_FOUND)
        .await?;
    Ok(())
}

#[rstest]
#[case::without_token(None)]
#[case::unknown_token(Some("testtoken"))]
#[tokio::test]
async fn should_forbid_patch_without_valid_token(
    #[future] app: TestApp,
    #[case] token: Option<&str>,
) -> anyhow::Result<()> {
    let mut app = app.await;
    let CreatedBooking { bookingid, .. } = app.create_booking(&single_booking()).await?;

    if let Some(token) = token {
        app.with_token(token);
    }
    app.with_path_param(PARAM_ID, bookingid)
        .with_json_body(&json!({"firstname": "Bond"}))?
        .patch(BOOKING_BY_ID)
        .expect_status(StatusCode::FORBIDDEN)
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_forbid_before_looking_up_booking(#[future] app: TestApp) -> anyhow::Result<()> {
    let mut app = app.await;

    app.with_path_param(PARAM_ID, i32::MAX)
        .with_body("not even json")
        .patch(BOOKING_BY_ID)
        .expect_status(StatusCode::FORBIDDEN)
        .await?;
    Ok(())
}
