use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use tracing::info;

use super::domain::{Booking, BookingFilter, BookingId, BookingRef, CreatedBooking, PatchBooking};
use super::repository::BookingRepository;
use crate::AppState;
use crate::auth::Authorized;
use crate::errors::ApiError;
use crate::extractors::{StrictJson, decode_json};

pub(crate) fn booking_router() -> Router<AppState> {
    Router::new()
        .route(
            "/booking",
            get(list_bookings)
                .post(create_booking)
                .delete(delete_collection),
        )
        .route(
            "/booking/{id}",
            get(get_booking)
                .put(update_booking)
                .patch(patch_booking)
                .delete(delete_booking),
        )
}

/// Ids that are not numbers name no booking.
fn booking_id(raw: &str) -> Result<BookingId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn list_bookings(
    State(repo): State<BookingRepository>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<BookingRef>>, ApiError> {
    let filter = BookingFilter::parse(query.as_deref())?;
    let result = repo.list(&filter).await;

    Ok(Json(result))
}

async fn create_booking(
    State(repo): State<BookingRepository>,
    StrictJson(booking): StrictJson<Booking>,
) -> Result<Json<CreatedBooking>, ApiError> {
    booking.validate()?;
    let created = repo.create(booking).await;
    info!(bookingid = created.bookingid, "booking created");

    Ok(Json(created))
}

async fn get_booking(
    State(repo): State<BookingRepository>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let id = booking_id(&id)?;
    repo.get(id).await.map(Json).ok_or(ApiError::NotFound)
}

async fn update_booking(
    _: Authorized,
    State(repo): State<BookingRepository>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Booking>, ApiError> {
    let id = booking_id(&id)?;
    if !repo.exists(id).await {
        return Err(ApiError::NotFound);
    }
    let booking: Booking = decode_json(&body)?;
    booking.validate()?;

    repo.update(id, booking).await.map(Json)
}

async fn patch_booking(
    _: Authorized,
    State(repo): State<BookingRepository>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Booking>, ApiError> {
    let id = booking_id(&id)?;
    if !repo.exists(id).await {
        return Err(ApiError::NotFound);
    }
    let patch: PatchBooking = decode_json(&body)?;

    repo.patch(id, patch).await.map(Json)
}

async fn delete_booking(
    _: Authorized,
    State(repo): State<BookingRepository>,
    Path(id): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let id = booking_id(&id)?;
    repo.delete(id).await?;
    info!(bookingid = id, "booking deleted");

    Ok((StatusCode::CREATED, "Created"))
}

async fn delete_collection() -> ApiError {
    ApiError::NotFound
}
