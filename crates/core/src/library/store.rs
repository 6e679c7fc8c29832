//! Storage seam for the library ledger.
//!
//! [`super::LibraryService`] is handed an implementation of this trait at
//! construction time; it never opens connections itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::LibraryError;
use super::types::{IssuedLoan, LoanRecord, LoanScope, NewLoan, Student};

/// Persistence operations the ledger needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Looks up a student by RFID tag.
    async fn find_student(&self, tag_id: &str) -> Result<Option<Student>, LibraryError>;

    /// Writes a loan as one atomic unit.
    ///
    /// The student check, the book lookup-or-create and the transaction
    /// insert must commit together or not at all. Fails with
    /// [`LibraryError::StudentNotFound`] when the tag is unknown, in which
    /// case nothing is written.
    async fn record_issue(&self, loan: &NewLoan) -> Result<IssuedLoan, LibraryError>;

    /// Marks a loan returned at `returned_at`.
    ///
    /// Returns `false` when no transaction has this ID.
    async fn mark_returned(
        &self,
        transaction_id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<bool, LibraryError>;

    /// Lists loans joined with student and book, newest issue first.
    async fn loans(&self, scope: LoanScope) -> Result<Vec<LoanRecord>, LibraryError>;
}
