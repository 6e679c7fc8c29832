//! Library service implementing the issue/return lifecycle.
//!
//! Every operation takes the current time explicitly so callers (and tests)
//! control the clock; HTTP handlers pass `Utc::now()`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::LibraryError;
use super::policy::{LoanStatus, due_at};
use super::store::LibraryStore;
use super::types::{
    ActiveLoan, IssueBookInput, IssueReceipt, LoanRecord, LoanScope, NewLoan, Student,
};

/// Message used when an issue request lacks its tag or title.
pub const MISSING_FIELDS: &str = "RFID ID and Book Name are required";

/// Library ledger service.
#[derive(Clone)]
pub struct LibraryService {
    store: Arc<dyn LibraryStore>,
}

impl LibraryService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Issues a book to a student.
    ///
    /// Validation runs before any storage access. The book is reused when
    /// one matches the input's [`super::BookMatch`] rule, otherwise created.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidInput`] if the tag or title is blank
    /// - [`LibraryError::StudentNotFound`] if the tag is unknown
    /// - [`LibraryError::Storage`] on database failure
    pub async fn issue_book(
        &self,
        input: IssueBookInput,
        now: DateTime<Utc>,
    ) -> Result<IssueReceipt, LibraryError> {
        if input.tag_id.trim().is_empty() || input.title.trim().is_empty() {
            return Err(LibraryError::InvalidInput(MISSING_FIELDS.to_string()));
        }

        let loan = NewLoan {
            tag_id: input.tag_id,
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            book_match: input.book_match,
            issued_at: now,
            due_at: due_at(now),
        };

        let issued = self.store.record_issue(&loan).await?;

        Ok(IssueReceipt {
            transaction_id: issued.transaction_id,
            book_id: issued.book_id,
            book_created: issued.book_created,
            title: loan.title,
            issued_at: loan.issued_at,
            due_at: loan.due_at,
        })
    }

    /// Marks a loan returned.
    ///
    /// Already-returned loans are accepted and get their return time
    /// overwritten.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::TransactionNotFound`] if no loan has this ID
    /// - [`LibraryError::Storage`] on database failure
    pub async fn return_book(
        &self,
        transaction_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), LibraryError> {
        if self.store.mark_returned(transaction_id, now).await? {
            Ok(())
        } else {
            Err(LibraryError::TransactionNotFound(transaction_id))
        }
    }

    /// Fetches a student by RFID tag.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::StudentNotFound`] if the tag is unknown
    /// - [`LibraryError::Storage`] on database failure
    pub async fn get_student(&self, tag_id: &str) -> Result<Student, LibraryError> {
        self.store
            .find_student(tag_id)
            .await?
            .ok_or_else(|| LibraryError::StudentNotFound(tag_id.to_string()))
    }

    /// Lists open loans, newest issue first, flagged overdue relative to `now`.
    pub async fn list_active_transactions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActiveLoan>, LibraryError> {
        let records = self.store.loans(LoanScope::Active).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let status = record.status(now);
                status.is_open().then(|| ActiveLoan {
                    overdue: status == LoanStatus::Overdue,
                    record,
                })
            })
            .collect())
    }

    /// Lists every loan, newest issue first.
    pub async fn list_all_transactions(&self) -> Result<Vec<LoanRecord>, LibraryError> {
        self.store.loans(LoanScope::All).await
    }
}
