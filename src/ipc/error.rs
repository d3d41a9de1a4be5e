//! Response envelopes written back on stdout, one per request line.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody<'a>>,
}

impl Envelope<'_> {
    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "ok": false }))
    }
}

fn failure<'a>(
    id: Option<&'a str>,
    code: &'a str,
    message: String,
    details: Option<Value>,
) -> Value {
    Envelope {
        id,
        ok: false,
        result: None,
        error: Some(ErrorBody {
            code,
            message,
            details,
        }),
    }
    .into_value()
}

pub fn ok(id: &str, result: Value) -> Value {
    Envelope {
        id: Some(id),
        ok: true,
        result: Some(result),
        error: None,
    }
    .into_value()
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    failure(Some(id), code, message.into(), details)
}

/// Reply to a line that did not parse as a request; there is no id to echo.
pub fn bad_json(message: impl Into<String>) -> Value {
    failure(None, "bad_json", message.into(), None)
}
