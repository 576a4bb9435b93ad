//! Endpoint templates and parameter names of the booking API.

/// Health check, answers 201.
pub const PING: &str = "/ping";

/// Token issuance.
pub const LOGIN: &str = "/auth";

/// Booking collection: list (with filters) and create.
pub const BOOKING_BASE: &str = "/booking";

/// One booking: read, update, partial update, delete.
pub const BOOKING_BY_ID: &str = "/booking/{id}";

/// Path parameter of [`BOOKING_BY_ID`].
pub const PARAM_ID: &str = "id";

/// Query filter on the guest first name.
pub const PARAM_FIRSTNAME: &str = "firstname";

/// Query filter on the guest last name.
pub const PARAM_LASTNAME: &str = "lastname";

/// Query filter: check-in on or after this date.
pub const PARAM_CHECKIN: &str = "checkin";

/// Query filter: check-out on or before this date.
pub const PARAM_CHECKOUT: &str = "checkout";
