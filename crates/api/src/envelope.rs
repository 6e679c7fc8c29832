//! Response envelopes.
//!
//! The browser-facing API wraps bodies as `{success, message}`; scanning
//! devices expect `{status, message}`. Both are rendered from the same
//! `Result<_, LibraryError>` so handlers share one code path.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use libris_core::library::{IssueReceipt, LibraryError};

/// Message sent to devices when a request lacks the tag or title.
pub const DEVICE_MISSING_FIELDS: &str = "Missing required fields";

/// Date format for due dates in issue responses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for loan listings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wire shape of a JSON response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"success": bool, "message": ...}` for the web interface.
    Web,
    /// `{"status": "success" | "error", "message": ...}` for scanning devices.
    Device,
}

impl Envelope {
    /// 200 response carrying the keys of `fields` plus the success marker.
    ///
    /// Non-object values contribute no keys.
    pub fn ok(self, fields: Value) -> Response {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        (StatusCode::OK, Json(self.body(true, fields))).into_response()
    }

    /// 200 response with a message and the success marker.
    pub fn ok_message(self, message: impl Into<String>) -> Response {
        let mut fields = Map::new();
        fields.insert("message".into(), Value::String(message.into()));
        self.ok(Value::Object(fields))
    }

    /// Success response for a book issue.
    pub fn issued(self, receipt: &IssueReceipt) -> Response {
        let message = match self {
            Self::Web => format!("Book \"{}\" issued successfully!", receipt.title),
            Self::Device => "Book issued successfully".to_string(),
        };
        let mut fields = Map::new();
        fields.insert("message".into(), Value::String(message));
        fields.insert(
            "return_date".into(),
            Value::String(receipt.due_date().format(DATE_FORMAT).to_string()),
        );
        self.ok(Value::Object(fields))
    }

    /// Error response for a ledger failure.
    pub fn failure(self, err: &LibraryError) -> Response {
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.reject(status, self.error_message(err))
    }

    /// Error response with an explicit status and message.
    pub fn reject(self, status: StatusCode, message: impl Into<String>) -> Response {
        let mut fields = Map::new();
        fields.insert("message".into(), Value::String(message.into()));
        (status, Json(self.body(false, fields))).into_response()
    }

    fn error_message(self, err: &LibraryError) -> String {
        match (self, err) {
            (Self::Web, LibraryError::InvalidInput(message)) => message.clone(),
            (Self::Device, LibraryError::InvalidInput(_)) => DEVICE_MISSING_FIELDS.to_string(),
            (_, LibraryError::StudentNotFound(_)) => "Student not found".to_string(),
            (_, LibraryError::TransactionNotFound(_)) => "Transaction not found".to_string(),
            (Self::Web, LibraryError::Storage(message)) => format!("Error: {message}"),
            (Self::Device, LibraryError::Storage(message)) => message.clone(),
        }
    }

    fn body(self, ok: bool, fields: Map<String, Value>) -> Value {
        let mut body = Map::new();
        match self {
            Self::Web => {
                body.insert("success".into(), Value::Bool(ok));
            }
            Self::Device => {
                let status = if ok { "success" } else { "error" };
                body.insert("status".into(), Value::String(status.into()));
            }
        }
        body.extend(fields);
        Value::Object(body)
    }
}
