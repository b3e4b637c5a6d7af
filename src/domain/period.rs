//! Half-open booking interval

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

/// Half-open time interval `[start, end)`.
///
/// Start is inclusive, end is exclusive: a booking ending at 10:00 and
/// another starting at 10:00 on the same car do not conflict. Construction
/// enforces `start < end`, so every value of this type is a valid interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(format!(
                "start_date ({}) must be before end_date ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Strict half-open overlap test: `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &BookingPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the interval covers the given instant.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl std::fmt::Display for BookingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

// ── Tests ──────────────────────────────────────────────────────
