//! Library loan ledger.
//!
//! This module implements the issue/return lifecycle:
//! - Domain types for students, books and loan transactions
//! - Loan policy (due dates, overdue detection, derived status)
//! - Error taxonomy shared by every layer
//! - The storage seam the service is injected with
//! - The service that implements each ledger operation

pub mod error;
pub mod policy;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use error::LibraryError;
pub use policy::{LOAN_PERIOD_DAYS, LoanStatus, due_at, is_overdue};
pub use service::LibraryService;
pub use store::LibraryStore;
pub use types::{
    ActiveLoan, BookMatch, IssueBookInput, IssueReceipt, IssuedLoan, LoanRecord, LoanScope,
    NewLoan, Student,
};
