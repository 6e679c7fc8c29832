//! Loan policy: due dates and overdue detection.
//!
//! While a loan is open its stored return timestamp holds the due date.
//! Once returned, the same column holds the actual return time, so the
//! overdue check must always consult the returned flag first.

use chrono::{DateTime, Duration, Utc};

/// Length of a loan in days.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Due timestamp for a loan issued at `issued_at`.
#[must_use]
pub fn due_at(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::days(LOAN_PERIOD_DAYS)
}

/// True iff the loan is open and `now` is past its stored return timestamp.
#[must_use]
pub fn is_overdue(returned: bool, return_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    !returned && now > return_at
}

/// Derived state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// Open and within its loan period.
    Active,
    /// Open and past its due date.
    Overdue,
    /// Book handed back.
    Returned,
}

impl LoanStatus {
    /// Derives the status from stored columns.
    #[must_use]
    pub fn derive(returned: bool, return_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if returned {
            Self::Returned
        } else if is_overdue(returned, return_at, now) {
            Self::Overdue
        } else {
            Self::Active
        }
    }

    /// Label shown on the index page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Overdue => "Overdue",
            Self::Returned => "Returned",
        }
    }

    /// Returns true while the book is still out.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::Overdue)
    }
}
