use std::fmt;
use std::time::Duration;

use http::StatusCode;

use crate::ExpectedStatusCodes;

/// What one race participant observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    /// The server answered with this status.
    Status(StatusCode),
    /// The participant never got a status: transport failure, panic...
    Failed(String),
}

/// Aggregated outcomes of a race.
///
/// The order in which participants finished is not kept: only the counts
/// matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceTally {
    /// Outcomes in the success set.
    pub success: usize,
    /// Outcomes in the expected rejection set.
    pub rejected: usize,
    /// Statuses outside both sets.
    pub unexpected: Vec<StatusCode>,
    /// Participants that did not get a status.
    pub errors: Vec<String>,
}

impl RaceTally {
    /// Classifies the outcomes against the success and rejection sets.
    pub fn count(
        outcomes: &[RaceOutcome],
        success: &ExpectedStatusCodes,
        rejected: &ExpectedStatusCodes,
    ) -> Self {
        let mut tally = Self::default();
        for outcome in outcomes {
            match outcome {
                RaceOutcome::Status(status) if success.contains_status_code(*status) => {
                    tally.success += 1;
                }
                RaceOutcome::Status(status) if rejected.contains_status_code(*status) => {
                    tally.rejected += 1;
                }
                RaceOutcome::Status(status) => tally.unexpected.push(*status),
                RaceOutcome::Failed(error) => tally.errors.push(error.clone()),
            }
        }
        tally.unexpected.sort();
        tally
    }

    /// Total number of outcomes.
    pub fn total(&self) -> usize {
        self.success + self.rejected + self.unexpected.len() + self.errors.len()
    }

    /// One success, every other participant rejected, nothing else.
    pub fn is_exactly_once_success(&self) -> bool {
        self.success == 1 && self.unexpected.is_empty() && self.errors.is_empty()
    }
}

impl fmt::Display for RaceTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} success, {} rejected, unexpected: [",
            self.success, self.rejected
        )?;
        for (index, status) in self.unexpected.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", status.as_u16())?;
        }
        write!(f, "], {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

/// The result of a race that held its invariant.
#[derive(Debug, Clone)]
pub struct RaceReport {
    /// Number of participants.
    pub participants: usize,
    /// Raw outcomes, in completion order.
    pub outcomes: Vec<RaceOutcome>,
    /// Classified outcomes.
    pub tally: RaceTally,
    /// Time from the start gate release to the last completion.
    pub elapsed: Duration,
}
