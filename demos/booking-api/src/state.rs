use std::time::{Duration, Instant};

use crate::auth::{Credentials, TokenStore};
use crate::bookings::repository::BookingRepository;

/// The application state
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    #[from_ref(skip)]
    started_at: Instant,
    repository: BookingRepository,
    tokens: TokenStore,
    credentials: Credentials,
}

impl AppState {
    /// Create an empty state accepting `credentials` on login
    pub fn new(credentials: Credentials) -> Self {
        Self {
            started_at: Instant::now(),
            repository: BookingRepository::default(),
            tokens: TokenStore::default(),
            credentials,
        }
    }

    pub(crate) fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
