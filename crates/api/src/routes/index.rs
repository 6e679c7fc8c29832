//! Server-rendered index page.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use tracing::error;

use libris_core::library::{ActiveLoan, LoanStatus};

use crate::{AppState, envelope::TIMESTAMP_FORMAT};

const TITLE: &str = "RFID Library Management System";

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
.container { max-width: 1200px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
h1, h2 { color: #333; text-align: center; }
.form-group { margin-bottom: 15px; }
label { display: block; margin-bottom: 5px; font-weight: bold; }
input { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
button { background-color: #007bff; color: white; padding: 12px 20px; border: none; border-radius: 4px; cursor: pointer; width: 100%; font-size: 16px; }
button:hover { background-color: #0056b3; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
th { background-color: #007bff; color: white; }
.section { margin-bottom: 30px; padding: 20px; border: 1px solid #ddd; border-radius: 4px; }
.return-btn { background-color: #28a745; }
.return-btn:hover { background-color: #218838; }
.warning { color: #dc3545; font-weight: bold; }
"#;

const SCRIPT: &str = r#"
function escapeHtml(value) {
    const div = document.createElement('div');
    div.textContent = value == null ? '' : String(value);
    return div.innerHTML;
}

document.getElementById('issueForm').addEventListener('submit', function (e) {
    e.preventDefault();
    const formData = new FormData(this);
    fetch('/api/issue_book', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
            rfid_id: formData.get('rfid'),
            book_name: formData.get('bookName'),
            author: formData.get('author'),
            isbn: formData.get('isbn')
        })
    })
    .then(response => response.json())
    .then(data => {
        alert(data.message);
        if (data.success) {
            location.reload();
        }
    })
    .catch(() => alert('An error occurred while issuing the book.'));
});

function returnBook(transactionId) {
    if (!confirm('Are you sure you want to mark this book as returned?')) {
        return;
    }
    fetch(`/api/return_book/${transactionId}`, { method: 'POST' })
    .then(response => response.json())
    .then(data => {
        alert(data.message);
        if (data.success) {
            location.reload();
        }
    })
    .catch(() => alert('An error occurred while returning the book.'));
}

function getStudentInfo() {
    const rfid = document.getElementById('searchRfid').value;
    if (!rfid) {
        alert('Please enter an RFID ID');
        return;
    }
    const infoDiv = document.getElementById('studentInfo');
    fetch(`/api/student/${encodeURIComponent(rfid)}`)
    .then(response => response.json())
    .then(data => {
        if (data.success) {
            infoDiv.innerHTML = `
                <h3>Student Details</h3>
                <p><strong>Name:</strong> ${escapeHtml(data.student.student_name)}</p>
                <p><strong>Class:</strong> ${escapeHtml(data.student.class)}</p>
                <p><strong>Roll Number:</strong> ${escapeHtml(data.student.roll_number)}</p>
            `;
        } else {
            infoDiv.innerHTML = `<p style="color: red;">${escapeHtml(data.message)}</p>`;
        }
    })
    .catch(() => {
        infoDiv.innerHTML = '<p style="color: red;">Error fetching student information.</p>';
    });
}
"#;

/// Creates the index route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET `/` - Active loans with issue and lookup forms.
async fn index(State(state): State<AppState>) -> Response {
    match state.library.list_active_transactions(Utc::now()).await {
        Ok(loans) => render_page(&loans).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load active loans");
            (StatusCode::INTERNAL_SERVER_ERROR, render_error(&e.to_string())).into_response()
        }
    }
}

/// Renders the full page with one table row per open loan.
pub fn render_page(loans: &[ActiveLoan]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (TITLE) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div.container {
                    h1 { (TITLE) }
                    (issue_form())
                    (loan_table(loans))
                    (student_lookup())
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

fn issue_form() -> Markup {
    html! {
        div.section {
            h2 { "Issue Book" }
            form id="issueForm" {
                div.form-group {
                    label for="rfid" { "RFID ID:" }
                    input type="text" id="rfid" name="rfid" required;
                }
                div.form-group {
                    label for="bookName" { "Book Name:" }
                    input type="text" id="bookName" name="bookName" required;
                }
                div.form-group {
                    label for="author" { "Author:" }
                    input type="text" id="author" name="author";
                }
                div.form-group {
                    label for="isbn" { "ISBN:" }
                    input type="text" id="isbn" name="isbn";
                }
                button type="submit" { "Issue Book" }
            }
        }
    }
}

fn loan_table(loans: &[ActiveLoan]) -> Markup {
    html! {
        div.section {
            h2 { "Current Book Issues" }
            table id="transactionsTable" {
                thead {
                    tr {
                        th { "Student Name" }
                        th { "Class" }
                        th { "Book Name" }
                        th { "Issue Date" }
                        th { "Return Date" }
                        th { "Status" }
                        th { "Action" }
                    }
                }
                tbody {
                    @for loan in loans {
                        @let record = &loan.record;
                        @let status = loan.status();
                        tr {
                            td { (record.student_name) }
                            td { (record.class_name.as_deref().unwrap_or_default()) }
                            td { (record.book_title) }
                            td { (record.issued_at.format(TIMESTAMP_FORMAT).to_string()) }
                            td { (record.return_at.format(TIMESTAMP_FORMAT).to_string()) }
                            td.warning[status == LoanStatus::Overdue] { (status.label()) }
                            td {
                                button.return-btn onclick={ "returnBook(" (record.id) ")" } {
                                    "Return"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn student_lookup() -> Markup {
    html! {
        div.section {
            h2 { "Student Information" }
            form id="studentForm" {
                div.form-group {
                    label for="searchRfid" { "Search RFID ID:" }
                    input type="text" id="searchRfid" name="searchRfid" required;
                }
                button type="button" onclick="getStudentInfo()" { "Get Student Info" }
            }
            div id="studentInfo" {}
        }
    }
}

fn render_error(message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head { title { (TITLE) } }
            body {
                h1 { "Error" }
                p { (message) }
            }
        }
    }
}
