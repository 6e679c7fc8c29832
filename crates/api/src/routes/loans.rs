//! Loan routes for the web interface.
//!
//! Responses use the `{success, message}` envelope.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use libris_core::library::{BookMatch, LibraryError, LoanRecord, Student};

use crate::{
    AppState,
    envelope::{Envelope, TIMESTAMP_FORMAT},
    extractors::IssueBookRequest,
};

/// Creates the loan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/issue_book", post(issue_book))
        .route("/api/return_book/{transaction_id}", post(return_book))
        .route("/api/student/{rfid_id}", get(get_student))
        .route("/api/transactions", get(list_transactions))
}

/// Student as returned by `/api/student/{rfid_id}`.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    /// RFID tag.
    pub rfid_id: String,
    /// Full name.
    pub student_name: String,
    /// Class label.
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    /// Roll number.
    pub roll_number: Option<String>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            rfid_id: student.tag_id,
            student_name: student.name,
            class_name: student.class_name,
            roll_number: student.roll_number,
        }
    }
}

/// Loan as returned by `/api/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: i32,
    /// Borrower's name.
    pub student_name: String,
    /// Borrower's class.
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    /// Book title.
    pub book_name: String,
    /// Issue timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub issue_date: String,
    /// Due timestamp while open, return timestamp once returned.
    pub return_date: String,
    /// Whether the book has been returned.
    pub returned: bool,
}

impl From<LoanRecord> for TransactionResponse {
    fn from(record: LoanRecord) -> Self {
        Self {
            id: record.id,
            student_name: record.student_name,
            class_name: record.class_name,
            book_name: record.book_title,
            issue_date: record.issued_at.format(TIMESTAMP_FORMAT).to_string(),
            return_date: record.return_at.format(TIMESTAMP_FORMAT).to_string(),
            returned: record.returned,
        }
    }
}

/// Logs a ledger failure at a level matching its status.
pub(crate) fn log_failure(err: &LibraryError, action: &str) {
    if err.is_not_found() {
        info!(error = %err, code = err.error_code(), action, "Lookup matched nothing");
    } else if err.http_status_code() >= 500 {
        error!(error = %err, code = err.error_code(), action, "Request failed");
    } else {
        warn!(error = %err, code = err.error_code(), action, "Request rejected");
    }
}

/// POST `/api/issue_book` - Issue a book from the web form.
async fn issue_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(payload) = payload
        .ok()
        .and_then(|Json(value)| IssueBookRequest::from_json(value))
    else {
        return Envelope::Web.reject(StatusCode::BAD_REQUEST, "No data provided");
    };

    let input = payload.into_input(BookMatch::TitleAndAuthor);
    match state.library.issue_book(input, Utc::now()).await {
        Ok(receipt) => {
            info!(
                transaction_id = receipt.transaction_id,
                book_id = receipt.book_id,
                due_date = %receipt.due_date(),
                "Book issued"
            );
            Envelope::Web.issued(&receipt)
        }
        Err(e) => {
            log_failure(&e, "issue_book");
            Envelope::Web.failure(&e)
        }
    }
}

/// POST `/api/return_book/{transaction_id}` - Mark a loan returned.
async fn return_book(
    State(state): State<AppState>,
    transaction_id: Result<Path<i32>, PathRejection>,
) -> Response {
    // Non-numeric IDs can never match a row
    let Ok(Path(transaction_id)) = transaction_id else {
        return Envelope::Web.reject(StatusCode::NOT_FOUND, "Transaction not found");
    };

    match state.library.return_book(transaction_id, Utc::now()).await {
        Ok(()) => {
            info!(transaction_id, "Book returned");
            Envelope::Web.ok_message("Book marked as returned successfully!")
        }
        Err(e) => {
            log_failure(&e, "return_book");
            Envelope::Web.failure(&e)
        }
    }
}

/// GET `/api/student/{rfid_id}` - Look up a student by tag.
async fn get_student(State(state): State<AppState>, Path(rfid_id): Path<String>) -> Response {
    match state.library.get_student(&rfid_id).await {
        Ok(student) => Envelope::Web.ok(json!({ "student": StudentResponse::from(student) })),
        Err(e) => {
            log_failure(&e, "get_student");
            Envelope::Web.failure(&e)
        }
    }
}

/// GET `/api/transactions` - List every loan, newest first.
async fn list_transactions(State(state): State<AppState>) -> Response {
    match state.library.list_all_transactions().await {
        Ok(records) => {
            let transactions: Vec<TransactionResponse> =
                records.into_iter().map(TransactionResponse::from).collect();
            Envelope::Web.ok(json!({ "transactions": transactions }))
        }
        Err(e) => {
            log_failure(&e, "list_transactions");
            Envelope::Web.failure(&e)
        }
    }
}
