//! Analytics event parsed from `POST /api/analytics/track`

use serde_json::{Map, Value};

/// A page event as reported by the storefront frontend
///
/// Every field is optional on the wire. Absent, `null` or unreadable values
/// become empty strings so that tracking never rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyticsEvent {
    pub event_type: String,
    pub page: String,
    pub timestamp: String,
    /// Free-form extra data, kept only when the client sent something non-null
    pub details: Option<Value>,
}

impl AnalyticsEvent {
    /// Build an event from a raw request body.
    ///
    /// Bodies that are not JSON, or JSON that is not an object, produce an
    /// event with all fields empty.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            _ => Self::default(),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            event_type: text_field(fields, "event_type"),
            page: text_field(fields, "page"),
            timestamp: text_field(fields, "timestamp"),
            details: fields.get("details").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Line written to the analytics sink
    pub fn log_line(&self) -> String {
        let mut line = format!(
            "Analytics Event: {} on {} at {}",
            self.event_type, self.page, self.timestamp
        );
        if let Some(details) = &self.details {
            line.push_str(&format!(" details={details}"));
        }
        line
    }
}

/// Strings are taken verbatim; other scalars and containers use their JSON text
fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_event() {
        let event = AnalyticsEvent::from_body(
            br#"{"event_type":"click","page":"/home","timestamp":"2025-01-01T00:00:00Z"}"#,
        );
        assert_eq!(event.event_type, "click");
        assert_eq!(event.page, "/home");
        assert_eq!(event.timestamp, "2025-01-01T00:00:00Z");
        assert_eq!(event.details, None);
        assert_eq!(
            event.log_line(),
            "Analytics Event: click on /home at 2025-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let event = AnalyticsEvent::from_body(b"{}");
        assert_eq!(event, AnalyticsEvent::default());
        assert_eq!(event.log_line(), "Analytics Event:  on  at ");
    }

    #[test]
    fn test_null_and_non_string_values() {
        let event = AnalyticsEvent::from_body(
            br#"{"event_type":null,"page":42,"timestamp":true,"details":null}"#,
        );
        assert_eq!(event.event_type, "");
        assert_eq!(event.page, "42");
        assert_eq!(event.timestamp, "true");
        assert_eq!(event.details, None);
    }

    #[test]
    fn test_malformed_bodies_are_tolerated() {
        for body in [&b""[..], b"not json", b"[1,2,3]", b"\"click\"", b"{\"page\":"] {
            assert_eq!(AnalyticsEvent::from_body(body), AnalyticsEvent::default());
        }
    }

    #[test]
    fn test_details_are_echoed() {
        let event = AnalyticsEvent::from_body(
            br#"{"event_type":"view","page":"/shop","timestamp":"t","details":{"game_id":1}}"#,
        );
        assert_eq!(
            event.log_line(),
            r#"Analytics Event: view on /shop at t details={"game_id":1}"#
        );
    }
}
