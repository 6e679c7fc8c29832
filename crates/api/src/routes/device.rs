//! Scanning-device endpoint.
//!
//! Devices post a tag and a title, as JSON or as a form, and read back
//! `{status, message, return_date}`.

use axum::{Router, extract::State, http::StatusCode, response::Response, routing::post};
use chrono::Utc;
use tracing::{info, warn};

use libris_core::library::BookMatch;

use crate::{
    AppState,
    envelope::{DEVICE_MISSING_FIELDS, Envelope},
    extractors::{JsonOrForm, JsonOrFormRejection},
    routes::loans::log_failure,
};

/// Creates the device routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/esp/issue", post(device_issue))
}

/// POST `/api/esp/issue` - Issue a book from a scanning device.
///
/// Books are matched on title alone.
async fn device_issue(
    State(state): State<AppState>,
    payload: Result<JsonOrForm, JsonOrFormRejection>,
) -> Response {
    let JsonOrForm(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable device payload");
            return Envelope::Device.reject(StatusCode::BAD_REQUEST, DEVICE_MISSING_FIELDS);
        }
    };

    let input = payload.into_input(BookMatch::TitleOnly);
    match state.library.issue_book(input, Utc::now()).await {
        Ok(receipt) => {
            info!(
                transaction_id = receipt.transaction_id,
                book_id = receipt.book_id,
                book_created = receipt.book_created,
                "Book issued from device"
            );
            Envelope::Device.issued(&receipt)
        }
        Err(e) => {
            log_failure(&e, "device_issue");
            Envelope::Device.failure(&e)
        }
    }
}
