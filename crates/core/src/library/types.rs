//! Library domain types.
//!
//! Students are seeded out-of-band and only ever read. Books are created
//! implicitly the first time a title is issued. Loans (stored as
//! "transactions") are created on issue and flipped to returned once.

use chrono::{DateTime, NaiveDate, Utc};
use super::policy::LoanStatus;

/// A student, identified by the RFID tag on their card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// RFID tag identifier.
    pub tag_id: String,
    /// Full name.
    pub name: String,
    /// Class or grade label, e.g. "10th Grade".
    pub class_name: Option<String>,
    /// Roll number within the class.
    pub roll_number: Option<String>,
}

/// How an issue request finds an existing book row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookMatch {
    /// Match on title and author (web interface).
    #[default]
    TitleAndAuthor,
    /// Match on title alone (scanning device).
    TitleOnly,
}

/// Request to issue a book to a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBookInput {
    /// RFID tag of the borrowing student.
    pub tag_id: String,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: Option<String>,
    /// Book ISBN, only recorded when the book row is created.
    pub isbn: Option<String>,
    /// Book lookup rule.
    pub book_match: BookMatch,
}

impl IssueBookInput {
    /// Creates an input matching books on title and author.
    pub fn new(tag_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            tag_id: tag_id.into(),
            title: title.into(),
            author: None,
            isbn: None,
            book_match: BookMatch::default(),
        }
    }

    /// Sets the author; blank values are treated as absent.
    #[must_use]
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = non_blank(author);
        self
    }

    /// Sets the ISBN; blank values are treated as absent.
    #[must_use]
    pub fn with_isbn(mut self, isbn: Option<String>) -> Self {
        self.isbn = non_blank(isbn);
        self
    }

    /// Sets the book lookup rule.
    #[must_use]
    pub const fn matching(mut self, book_match: BookMatch) -> Self {
        self.book_match = book_match;
        self
    }
}

/// A validated loan, ready to be written by a [`super::LibraryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    /// RFID tag of the borrowing student.
    pub tag_id: String,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: Option<String>,
    /// Book ISBN.
    pub isbn: Option<String>,
    /// Book lookup rule.
    pub book_match: BookMatch,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
    /// Due timestamp, stored in the return column until the book comes back.
    pub due_at: DateTime<Utc>,
}

/// Identifiers produced by the store when a loan is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedLoan {
    /// New transaction ID.
    pub transaction_id: i32,
    /// Book the loan points at.
    pub book_id: i32,
    /// Whether the book row was created by this issue.
    pub book_created: bool,
}

/// Result of a successful issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReceipt {
    /// New transaction ID.
    pub transaction_id: i32,
    /// Book the loan points at.
    pub book_id: i32,
    /// Whether the book row was created by this issue.
    pub book_created: bool,
    /// Title as issued.
    pub title: String,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
    /// Due timestamp.
    pub due_at: DateTime<Utc>,
}

impl IssueReceipt {
    /// Due date with date-only precision, as shown to borrowers.
    #[must_use]
    pub fn due_date(&self) -> NaiveDate {
        self.due_at.date_naive()
    }
}

/// A loan joined with its student and book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRecord {
    /// Transaction ID.
    pub id: i32,
    /// Borrower's RFID tag.
    pub tag_id: String,
    /// Borrower's name.
    pub student_name: String,
    /// Borrower's class.
    pub class_name: Option<String>,
    /// Book ID.
    pub book_id: i32,
    /// Book title.
    pub book_title: String,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
    /// Due timestamp while open, actual return time once returned.
    pub return_at: DateTime<Utc>,
    /// Whether the book has been returned.
    pub returned: bool,
}

impl LoanRecord {
    /// Derived status of this loan at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> LoanStatus {
        LoanStatus::derive(self.returned, self.return_at, now)
    }
}

/// An open loan annotated with its overdue flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLoan {
    /// The loan.
    pub record: LoanRecord,
    /// Whether the due date has passed.
    pub overdue: bool,
}

impl ActiveLoan {
    /// Status shown for this loan.
    #[must_use]
    pub const fn status(&self) -> LoanStatus {
        if self.overdue {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }
}

/// Which loans a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanScope {
    /// Only loans not yet returned.
    Active,
    /// Every loan.
    All,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
