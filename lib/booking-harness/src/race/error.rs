use std::time::Duration;

use super::RaceTally;
use crate::ApiClientError;

/// Errors from [`RaceHarness`](super::RaceHarness).
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum RaceError {
    /// The harness was misconfigured; nothing was sent.
    #[display("Invalid race setup: {message}")]
    Setup {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Participants did not all finish in time; the stragglers were aborted.
    #[display("Race did not complete within {timeout:?}: {completed}/{participants} participants finished")]
    Timeout {
        /// The configured bound.
        timeout: Duration,
        /// Participants that finished before the bound.
        completed: usize,
        /// Participants started.
        participants: usize,
    },

    /// The outcomes do not show exactly one success.
    #[display("Expected exactly one success: {tally}")]
    InvariantViolation {
        /// Counts of every outcome.
        tally: RaceTally,
    },

    /// The check run after the race failed.
    #[display("Post-race confirmation failed: {error}")]
    Confirmation {
        /// The client error of the confirmation call.
        error: ApiClientError,
    },
}
