//! Property-based tests for the loan policy.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use super::policy::{LOAN_PERIOD_DAYS, LoanStatus, due_at, is_overdue};

/// Strategy for timestamps between 2000 and 2100.
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_800i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The due date is always exactly one loan period after issue.
    #[test]
    fn prop_due_is_issue_plus_loan_period(issued in timestamp()) {
        let due = due_at(issued);
        prop_assert_eq!(due - issued, Duration::days(LOAN_PERIOD_DAYS));
    }

    /// An open loan is overdue exactly when now is past the due timestamp.
    #[test]
    fn prop_overdue_iff_past_due(issued in timestamp(), offset_secs in -3_000_000i64..3_000_000i64) {
        let due = due_at(issued);
        let now = due + Duration::seconds(offset_secs);
        prop_assert_eq!(is_overdue(false, due, now), offset_secs > 0);
        prop_assert!(!is_overdue(true, due, now));
    }

    /// The derived status agrees with the overdue flag for open loans.
    #[test]
    fn prop_status_matches_overdue(issued in timestamp(), offset_secs in -3_000_000i64..3_000_000i64, returned in any::<bool>()) {
        let due = due_at(issued);
        let now = due + Duration::seconds(offset_secs);
        let status = LoanStatus::derive(returned, due, now);
        prop_assert_eq!(status.is_open(), !returned);
        prop_assert_eq!(status == LoanStatus::Overdue, is_overdue(returned, due, now));
    }
}
