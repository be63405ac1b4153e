//! Widget response classification
//!
//! Turns a raw endpoint payload into a [`WidgetPayload`]: either a server
//! reported error with the best message available, or a markup fragment.

use serde_json::Value;

const GENERIC_ERROR: &str = "An error occurred while loading the personal menu";

/// Classified endpoint response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetPayload {
    /// The server reported a failure; `message` is fit for display
    Error { message: String },
    /// Fresh markup for the widget region
    Markup { html: String },
    /// A successful response that carried no markup
    Empty,
}

/// Classify a widget payload
///
/// A payload is an error when it carries a truthy `error`, an `errorcode` or an
/// `exception` field. A JSON document delivered as a string is decoded first.
pub fn classify(payload: &Value) -> WidgetPayload {
    if let Value::String(raw) = payload {
        if let Ok(decoded) = serde_json::from_str::<Value>(raw) {
            if decoded.is_object() {
                return classify(&decoded);
            }
        }
        return WidgetPayload::Empty;
    }

    let Some(obj) = payload.as_object() else {
        return WidgetPayload::Empty;
    };

    let is_error = obj.get("error").map(truthy).unwrap_or(false)
        || obj.get("errorcode").map(truthy).unwrap_or(false)
        || obj.get("exception").map(truthy).unwrap_or(false);

    if is_error {
        return WidgetPayload::Error {
            message: best_message(obj),
        };
    }

    match obj.get("html") {
        Some(Value::String(html)) => WidgetPayload::Markup { html: html.clone() },
        _ => WidgetPayload::Empty,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn best_message(obj: &serde_json::Map<String, Value>) -> String {
    ["error", "message", "errorcode"]
        .iter()
        .filter_map(|field| obj.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}
