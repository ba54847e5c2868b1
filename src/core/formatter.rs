//! Formatters turn an entry into the text every target writes
//!
//! - [`default_formatter`]: `<RFC3339> [<Severity>][<Category>] <Message><CallStack>`
//! - [`json_formatter`]: one JSON object per entry

use super::entry::Entry;
use super::logger::Logger;
use chrono::SecondsFormat;
use std::sync::Arc;

/// Formats an entry on behalf of the logger handle that produced it
pub type Formatter = Arc<dyn Fn(&Logger, &Entry) -> String + Send + Sync>;

/// Wrap a closure as a [`Formatter`]
pub fn formatter<F>(f: F) -> Formatter
where
    F: Fn(&Logger, &Entry) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// `2021-06-01T12:00:00+08:00 [Error][app] boom` followed by any call-stack text
pub fn default_formatter(_logger: &Logger, entry: &Entry) -> String {
    format!(
        "{} [{}][{}] {}{}",
        entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        entry.severity,
        entry.category,
        entry.message,
        entry.call_stack()
    )
}

/// `{"timestamp":"...","severity":"Error","category":"app","message":"boom"}`
///
/// `call_stack` is included only when one was captured.
pub fn json_formatter(_logger: &Logger, entry: &Entry) -> String {
    let mut object = serde_json::Map::new();
    object.insert(
        "timestamp".to_string(),
        serde_json::Value::String(entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    object.insert(
        "severity".to_string(),
        serde_json::Value::String(entry.severity.as_str().to_string()),
    );
    object.insert(
        "category".to_string(),
        serde_json::Value::String(entry.category.clone()),
    );
    object.insert(
        "message".to_string(),
        serde_json::Value::String(entry.message.clone()),
    );
    if let Some(ref call_stack) = entry.call_stack {
        object.insert(
            "call_stack".to_string(),
            serde_json::Value::String(call_stack.clone()),
        );
    }
    serde_json::Value::Object(object).to_string()
}
