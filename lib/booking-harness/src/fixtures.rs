//! Booking fixtures stored as JSON arrays.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Booking;

/// Failure to load a fixture file.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum FixtureError {
    /// The file could not be read.
    #[display("Cannot read fixture {}: {source}", path.display())]
    Io {
        /// The fixture file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON array of bookings.
    #[display("Invalid fixture {} at '{at}': {source}", path.display())]
    Json {
        /// The fixture file.
        path: PathBuf,
        /// Location of the offending value.
        at: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Loads every booking of a fixture file.
///
/// # Errors
///
/// Returns [`FixtureError`] if the file cannot be read or decoded.
pub fn load_booking_requests(path: impl AsRef<Path>) -> Result<Vec<Booking>, FixtureError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let deserializer = &mut serde_json::Deserializer::from_str(&contents);
    let bookings: Vec<Booking> =
        serde_path_to_error::deserialize(deserializer).map_err(|err| FixtureError::Json {
            path: path.to_path_buf(),
            at: err.path().to_string(),
            source: err.into_inner(),
        })?;

    debug!(path = %path.display(), count = bookings.len(), "fixture loaded");
    Ok(bookings)
}
