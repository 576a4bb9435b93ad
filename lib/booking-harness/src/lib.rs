//! # Booking harness
//!
//! Integration test tooling for a restful-booker style booking API.
//!
//! - [`RestClient`]: a fluent HTTP client whose per-request state (path and
//!   query parameters, session token, body) is reset after every call,
//!   whatever its outcome.
//! - [`RaceHarness`]: fires the same request from several tasks at once and
//!   checks that exactly one of them succeeded.
//! - [`test_client`]: starts a server in-process for the tests.
//! - Helpers for the booking domain: [`fixtures`], [`dates`], [`assertions`],
//!   [`auth`], [`config`].
//!
//! ```rust,no_run
//! use booking_harness::endpoints::{BOOKING_BASE, BOOKING_BY_ID};
//! use booking_harness::{Booking, CreatedBooking, RaceHarness, RestClient};
//!
//! # async fn example(booking: &Booking, token: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = RestClient::builder()
//!     .with_base_url("http://localhost:3000")?
//!     .build()?;
//!
//! let created: CreatedBooking = client
//!     .with_json_body(booking)?
//!     .post(BOOKING_BASE)
//!     .await?
//!     .as_json()?;
//!
//! let id = created.bookingid;
//! let token = token.to_string();
//! let report = RaceHarness::new(&client)
//!     .run(move |mut client| {
//!         client
//!             .with_token(token.as_str())
//!             .with_path_param("id", id)
//!             .delete(BOOKING_BY_ID)
//!             .expect_any_status()
//!             .into_future()
//!     })
//!     .await?;
//! assert_eq!(report.tally.success, 1);
//! # Ok(())
//! # }
//! ```

mod client;

pub mod assertions;
pub mod auth;
pub mod booking;
pub mod config;
pub mod dates;
pub mod endpoints;
pub mod fixtures;
pub mod race;
pub mod test_client;

pub use self::booking::{Booking, BookingDates, BookingRef, CreatedBooking};
pub use self::client::{
    ApiCall, ApiClientError, CallBody, CallPath, CallResult, DEFAULT_MAX_RESPONSE_TIME,
    DEFAULT_REQUEST_TIMEOUT, ExpectedStatusCodes, ParamValue, RawBody, RequestState, RestClient,
    RestClientBuilder, SecureString, TOKEN_COOKIE, TokenTransport,
};
pub use self::race::{RaceError, RaceHarness, RaceReport, RaceTally};

/// Builds an [`ExpectedStatusCodes`] from single codes and inclusive ranges.
///
/// ```rust
/// use booking_harness::expected_status_codes;
///
/// let rejected = expected_status_codes!(404, 405);
/// assert!(rejected.contains(405));
///
/// let success = expected_status_codes!(200-204);
/// assert!(success.contains(204));
/// ```
#[macro_export]
macro_rules! expected_status_codes {
    (@accumulate $codes:ident) => {};

    (@accumulate $codes:ident,) => {};

    (@accumulate $codes:ident, $start:literal - $end:literal $($rest:tt)*) => {
        $codes = $codes.add_inclusive_range($start..=$end);
        $crate::expected_status_codes!(@accumulate $codes $($rest)*);
    };

    (@accumulate $codes:ident, $single:literal $($rest:tt)*) => {
        $codes = $codes.add_single($single);
        $crate::expected_status_codes!(@accumulate $codes $($rest)*);
    };

    ($($codes:tt)*) => {{
        #[allow(unused_mut)]
        let mut codes = $crate::ExpectedStatusCodes::default();
        $crate::expected_status_codes!(@accumulate codes, $($codes)*);
        codes
    }};
}
