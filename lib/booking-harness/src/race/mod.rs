//! Concurrent contention checks.
//!
//! A [`RaceHarness`] fires the same operation from several tasks at once,
//! released together by a start gate, and checks that the server let exactly
//! one of them succeed.
//!
//! ```rust,no_run
//! use booking_harness::{RaceHarness, RestClient};
//! use http::StatusCode;
//!
//! # async fn example(client: &RestClient, id: i64, token: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let token = token.to_string();
//! let report = RaceHarness::new(client)
//!     .with_participants(2)
//!     .run_and_confirm(
//!         move |mut client| {
//!             let token = token.clone();
//!             async move {
//!                 client
//!                     .with_token(token)
//!                     .with_path_param("id", id)
//!                     .delete("/booking/{id}")
//!                     .expect_any_status()
//!                     .await
//!             }
//!         },
//!         move |mut client| async move {
//!             client
//!                 .with_path_param("id", id)
//!                 .get("/booking/{id}")
//!                 .expect_status(StatusCode::NOT_FOUND)
//!                 .await
//!         },
//!     )
//!     .await?;
//! assert_eq!(report.tally.success, 1);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;
use tokio::sync::{Barrier, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::{ApiClientError, CallResult, ExpectedStatusCodes, RestClient};

mod error;
pub use self::error::RaceError;

mod tally;
pub use self::tally::{RaceOutcome, RaceReport, RaceTally};

/// Default number of participants.
pub const DEFAULT_PARTICIPANTS: usize = 2;

/// Default bound on the whole race.
pub const DEFAULT_RACE_TIMEOUT: Duration = Duration::from_secs(10);

/// Races one operation from several tasks and checks that exactly one wins.
///
/// Defaults fit a delete race: 201 is the success, 404 and 405 the expected
/// rejections.
#[derive(Debug)]
pub struct RaceHarness {
    client: RestClient,
    participants: usize,
    timeout: Duration,
    success: ExpectedStatusCodes,
    rejected: ExpectedStatusCodes,
}

impl RaceHarness {
    /// Creates a harness whose participants each get a fork of `client`.
    pub fn new(client: &RestClient) -> Self {
        Self {
            client: client.fork(),
            participants: DEFAULT_PARTICIPANTS,
            timeout: DEFAULT_RACE_TIMEOUT,
            success: ExpectedStatusCodes::from_status_code(StatusCode::CREATED),
            rejected: crate::expected_status_codes!(404, 405),
        }
    }

    /// Sets the number of concurrent participants.
    #[must_use]
    pub fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Bounds the time between spawning the participants and their last
    /// completion.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Statuses counted as the winning outcome.
    #[must_use]
    pub fn with_success_statuses(mut self, success: impl Into<ExpectedStatusCodes>) -> Self {
        self.success = success.into();
        self
    }

    /// Statuses expected from the losing participants.
    #[must_use]
    pub fn with_rejected_statuses(mut self, rejected: impl Into<ExpectedStatusCodes>) -> Self {
        self.rejected = rejected.into();
        self
    }

    fn check_setup(&self) -> Result<(), RaceError> {
        if self.participants == 0 {
            return Err(RaceError::Setup {
                message: "a race needs at least one participant".to_string(),
            });
        }
        if self.success.is_empty() {
            return Err(RaceError::Setup {
                message: "the success status set is empty".to_string(),
            });
        }
        if !self.success.is_disjoint(&self.rejected) {
            return Err(RaceError::Setup {
                message: format!(
                    "success statuses {} overlap rejected statuses {}",
                    self.success, self.rejected
                ),
            });
        }
        Ok(())
    }

    /// Runs the race.
    ///
    /// Each participant gets its own client, waits on the start gate, then
    /// performs `operation` once. Participants still running when the
    /// timeout elapses are aborted.
    ///
    /// # Errors
    ///
    /// - [`RaceError::Setup`] for an unusable configuration
    /// - [`RaceError::Timeout`] if participants did not finish in time
    /// - [`RaceError::InvariantViolation`] unless exactly one participant
    ///   succeeded and all the others were rejected
    pub async fn run<F, Fut>(&self, operation: F) -> Result<RaceReport, RaceError>
    where
        F: Fn(RestClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallResult, ApiClientError>> + Send + 'static,
    {
        self.check_setup()?;
        let participants = self.participants;

        let start_gate = Arc::new(Barrier::new(participants + 1));
        let outcomes = Arc::new(Mutex::new(Vec::with_capacity(participants)));
        let operation = Arc::new(operation);

        let mut workers = JoinSet::new();
        for index in 0..participants {
            let client = self.client.fork();
            let start_gate = Arc::clone(&start_gate);
            let outcomes = Arc::clone(&outcomes);
            let operation = Arc::clone(&operation);
            workers.spawn(async move {
                start_gate.wait().await;
                let outcome = match (*operation)(client).await {
                    Ok(result) => RaceOutcome::Status(result.status()),
                    Err(err) => {
                        warn!(index, %err, "race participant got an error");
                        match err.actual_status() {
                            Some(status) => RaceOutcome::Status(status),
                            None => RaceOutcome::Failed(err.to_string()),
                        }
                    }
                };
                debug!(index, ?outcome, "race participant done");
                outcomes.lock().await.push(outcome);
            });
        }

        let mut started = None;
        let mut completed = 0;
        let race = async {
            start_gate.wait().await;
            started = Some(Instant::now());
            info!(participants, "race started");
            while let Some(joined) = workers.join_next().await {
                completed += 1;
                if let Err(err) = joined {
                    error!(%err, "race participant did not complete");
                    outcomes
                        .lock()
                        .await
                        .push(RaceOutcome::Failed(format!("participant task failed: {err}")));
                }
            }
        };
        let finished = tokio::time::timeout(self.timeout, race).await;

        if finished.is_err() {
            workers.abort_all();
            workers.shutdown().await;
            error!(timeout = ?self.timeout, completed, participants, "race timed out");
            return Err(RaceError::Timeout {
                timeout: self.timeout,
                completed,
                participants,
            });
        }

        let elapsed = started.map(|start| start.elapsed()).unwrap_or_default();
        let outcomes = mem::take(&mut *outcomes.lock().await);
        let tally = RaceTally::count(&outcomes, &self.success, &self.rejected);
        info!(%tally, ?elapsed, "race finished");

        if !tally.is_exactly_once_success() {
            return Err(RaceError::InvariantViolation { tally });
        }

        Ok(RaceReport {
            participants,
            outcomes,
            tally,
            elapsed,
        })
    }

    /// Runs one check outside the race, on a fresh client.
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::Confirmation`] if the check fails.
    pub async fn confirm<F, Fut>(&self, check: F) -> Result<CallResult, RaceError>
    where
        F: FnOnce(RestClient) -> Fut,
        Fut: Future<Output = Result<CallResult, ApiClientError>>,
    {
        check(self.client.fork()).await.map_err(|error| {
            error!(%error, "post-race confirmation failed");
            RaceError::Confirmation { error }
        })
    }

    /// Runs the race, then the confirmation check.
    ///
    /// # Errors
    ///
    /// See [`RaceHarness::run`] and [`RaceHarness::confirm`].
    pub async fn run_and_confirm<F, Fut, C, CFut>(
        &self,
        operation: F,
        check: C,
    ) -> Result<RaceReport, RaceError>
    where
        F: Fn(RestClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallResult, ApiClientError>> + Send + 'static,
        C: FnOnce(RestClient) -> CFut,
        CFut: Future<Output = Result<CallResult, ApiClientError>>,
    {
        let report = self.run(operation).await?;
        self.confirm(check).await?;
        Ok(report)
    }
}
