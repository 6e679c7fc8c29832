//! Request extractors.

use axum::{
    Form, Json,
    extract::{
        FromRequest, Request,
        rejection::{FormRejection, JsonRejection},
    },
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use libris_core::library::{BookMatch, IssueBookInput};

/// Issue request body shared by the web and device endpoints.
///
/// Every field is optional at the wire level; the ledger reports missing
/// tags and titles itself.
#[derive(Debug, Default, Deserialize)]
pub struct IssueBookRequest {
    /// Student RFID tag; readers may send it as a JSON number.
    #[serde(default, deserialize_with = "text_or_number")]
    pub rfid_id: Option<String>,
    /// Book title.
    pub book_name: Option<String>,
    /// Book author.
    pub author: Option<String>,
    /// Book ISBN.
    pub isbn: Option<String>,
}

impl IssueBookRequest {
    /// Decodes a JSON body, or `None` when it is empty or not an object.
    ///
    /// `null`, `false`, `0`, `""`, `[]` and `{}` all count as empty.
    pub fn from_json(value: Value) -> Option<Self> {
        if is_empty_payload(&value) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Converts the body into a ledger input using the given book lookup rule.
    pub fn into_input(self, book_match: BookMatch) -> IssueBookInput {
        IssueBookInput::new(
            self.rfid_id.unwrap_or_default(),
            self.book_name.unwrap_or_default(),
        )
        .with_author(self.author)
        .with_isbn(self.isbn)
        .matching(book_match)
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

/// Issue body accepted as JSON or as an urlencoded form.
///
/// Scanning devices post whichever is cheaper for their firmware, so the
/// `Content-Type` header picks the decoder.
#[derive(Debug)]
pub struct JsonOrForm(pub IssueBookRequest);

/// Rejection for [`JsonOrForm`].
#[derive(Debug)]
pub enum JsonOrFormRejection {
    /// JSON body could not be decoded.
    Json(JsonRejection),
    /// Form body could not be decoded.
    Form(FormRejection),
}

impl std::fmt::Display for JsonOrFormRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "{}", e.body_text()),
            Self::Form(e) => write!(f, "{}", e.body_text()),
        }
    }
}

impl IntoResponse for JsonOrFormRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(e) => e.into_response(),
            Self::Form(e) => e.into_response(),
        }
    }
}

impl<S> FromRequest<S> for JsonOrForm
where
    S: Send + Sync,
{
    type Rejection = JsonOrFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim_start().starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<IssueBookRequest>::from_request(req, state)
                .await
                .map_err(JsonOrFormRejection::Json)?;
            Ok(Self(body))
        } else {
            let Form(body) = Form::<IssueBookRequest>::from_request(req, state)
                .await
                .map_err(JsonOrFormRejection::Form)?;
            Ok(Self(body))
        }
    }
}
