use std::fmt;
use std::ops::RangeInclusive;

use http::StatusCode;

/// Set of status codes a call accepts.
///
/// Built from single codes and inclusive ranges. An empty set accepts
/// nothing; [`ExpectedStatusCodes::any`] accepts every valid status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedStatusCodes {
    ranges: Vec<StatusCodeRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusCodeRange {
    Single(u16),
    Inclusive(RangeInclusive<u16>),
}

impl ExpectedStatusCodes {
    /// Accepts every status code between 100 and 599.
    pub fn any() -> Self {
        Self {
            ranges: vec![StatusCodeRange::Inclusive(100..=599)],
        }
    }

    /// Accepts exactly one status code.
    pub fn from_status_code(status: StatusCode) -> Self {
        Self {
            ranges: vec![StatusCodeRange::Single(status.as_u16())],
        }
    }

    /// Accepts any of the listed status codes.
    ///
    /// ```rust
    /// use booking_harness::ExpectedStatusCodes;
    /// use http::StatusCode;
    ///
    /// let rejected = ExpectedStatusCodes::from_status_codes([
    ///     StatusCode::NOT_FOUND,
    ///     StatusCode::METHOD_NOT_ALLOWED,
    /// ]);
    /// assert!(rejected.contains_status_code(StatusCode::NOT_FOUND));
    /// assert!(!rejected.contains_status_code(StatusCode::CREATED));
    /// ```
    pub fn from_status_codes(statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            ranges: statuses
                .into_iter()
                .map(|status| StatusCodeRange::Single(status.as_u16()))
                .collect(),
        }
    }

    /// Accepts an inclusive range of status codes.
    pub fn from_status_code_range_inclusive(range: RangeInclusive<StatusCode>) -> Self {
        let start = range.start().as_u16();
        let end = range.end().as_u16();
        Self {
            ranges: vec![StatusCodeRange::Inclusive(start..=end)],
        }
    }

    /// Adds a single accepted status code.
    #[must_use]
    pub fn add_status_code(mut self, status: StatusCode) -> Self {
        self.ranges.push(StatusCodeRange::Single(status.as_u16()));
        self
    }

    /// Adds a single accepted raw status code.
    #[must_use]
    pub fn add_single(mut self, status: u16) -> Self {
        self.ranges.push(StatusCodeRange::Single(status));
        self
    }

    /// Adds an inclusive range of raw status codes.
    #[must_use]
    pub fn add_inclusive_range(mut self, range: RangeInclusive<u16>) -> Self {
        self.ranges.push(StatusCodeRange::Inclusive(range));
        self
    }

    /// Returns `true` if no status code is accepted.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Checks if a raw status code is accepted.
    pub fn contains(&self, status: u16) -> bool {
        self.ranges.iter().any(|range| match range {
            StatusCodeRange::Single(s) => *s == status,
            StatusCodeRange::Inclusive(r) => r.contains(&status),
        })
    }

    /// Checks if an `http::StatusCode` is accepted.
    pub fn contains_status_code(&self, status: StatusCode) -> bool {
        self.contains(status.as_u16())
    }

    /// Checks that both sets have no status code in common.
    pub(crate) fn is_disjoint(&self, other: &Self) -> bool {
        !(100..=599).any(|code| self.contains(code) && other.contains(code))
    }
}

impl From<StatusCode> for ExpectedStatusCodes {
    fn from(status: StatusCode) -> Self {
        Self::from_status_code(status)
    }
}

impl fmt::Display for ExpectedStatusCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            return write!(f, "<none>");
        }
        for (index, range) in self.ranges.iter().enumerate() {
            if index > 0 {
                write!(f, "|")?;
            }
            match range {
                StatusCodeRange::Single(status) => write!(f, "{status}")?,
                StatusCodeRange::Inclusive(r) => write!(f, "{}..={}", r.start(), r.end())?,
            }
        }
        Ok(())
    }
}
