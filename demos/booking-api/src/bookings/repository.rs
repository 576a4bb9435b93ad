use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::domain::{Booking, BookingFilter, BookingId, BookingRef, CreatedBooking, PatchBooking};
use crate::errors::ApiError;

#[derive(Debug)]
struct Store {
    next_id: BookingId,
    bookings: BTreeMap<BookingId, Booking>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            bookings: BTreeMap::new(),
        }
    }
}

/// In-memory bookings.
///
/// Every mutation holds the write lock for its whole check-then-act
/// sequence, so racing deletes of one id succeed exactly once.
#[derive(Debug, Clone, Default)]
pub(crate) struct BookingRepository {
    store: Arc<RwLock<Store>>,
}

impl BookingRepository {
    pub(crate) async fn list(&self, filter: &BookingFilter) -> Vec<BookingRef> {
        let store = self.store.read().await;
        store
            .bookings
            .iter()
            .filter(|(_, booking)| filter.matches(booking))
            .map(|(bookingid, _)| BookingRef {
                bookingid: *bookingid,
            })
            .collect()
    }

    pub(crate) async fn create(&self, booking: Booking) -> CreatedBooking {
        let mut store = self.store.write().await;
        let bookingid = store.next_id;
        store.next_id += 1;
        store.bookings.insert(bookingid, booking.clone());
        debug!(bookingid, "booking stored");

        CreatedBooking { bookingid, booking }
    }

    pub(crate) async fn get(&self, id: BookingId) -> Option<Booking> {
        self.store.read().await.bookings.get(&id).cloned()
    }

    pub(crate) async fn exists(&self, id: BookingId) -> bool {
        self.store.read().await.bookings.contains_key(&id)
    }

    pub(crate) async fn update(&self, id: BookingId, booking: Booking) -> Result<Booking, ApiError> {
        let mut store = self.store.write().await;
        let current = store.bookings.get_mut(&id).ok_or(ApiError::NotFound)?;
        *current = booking.clone();

        Ok(booking)
    }

    pub(crate) async fn patch(&self, id: BookingId, patch: PatchBooking) -> Result<Booking, ApiError> {
        let mut store = self.store.write().await;
        let current = store.bookings.get_mut(&id).ok_or(ApiError::NotFound)?;
        let patched = patch.apply(current)?;
        *current = patched.clone();

        Ok(patched)
    }

    pub(crate) async fn delete(&self, id: BookingId) -> Result<(), ApiError> {
        let mut store = self.store.write().await;
        store.bookings.remove(&id).ok_or(ApiError::NotFound)?;
        debug!(bookingid = id, "booking removed");

        Ok(())
    }
}
