use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::RelayError;

/// Field listing every service the document passed through
pub const SERVICES_VISITED: &str = "services_visited";
/// Field holding the dated event log
pub const EVENTS: &str = "events";
/// Event key stamped by the relay-to-queue handler
pub const WRITING_RECURSION_EVENT: &str = "s3WritingRecursion";

/// The JSON object travelling through the pipeline
pub type Document = Map<String, Value>;

/// Response envelope the platform expects from every handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub status_code: u16,
    /// JSON-serialized payload
    pub body: String,
}

impl InvocationResult {
    pub fn new(status_code: u16, body: &Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    pub fn ok(body: &Value) -> Self {
        Self::new(200, body)
    }

    pub fn bad_request(body: &Value) -> Self {
        Self::new(400, body)
    }

    pub fn internal_error(body: &Value) -> Self {
        Self::new(500, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// `detail` block of a storage object-created notification
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    pub detail: StorageDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageDetail {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

impl StorageEvent {
    /// Typed view over a raw event; other fields are ignored
    pub fn from_event(event: &Value) -> Result<Self, RelayError> {
        Self::deserialize(event).map_err(|e| RelayError::structural(e.to_string()))
    }

    pub fn bucket(&self) -> &str {
        &self.detail.bucket.name
    }

    pub fn key(&self) -> &str {
        &self.detail.object.key
    }
}

/// Batch of queued messages
///
/// Records stay raw so one malformed record cannot reject the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records")]
    pub records: Vec<Value>,
}

impl QueueEvent {
    pub fn from_event(event: &Value) -> Result<Self, RelayError> {
        Self::deserialize(event).map_err(|e| RelayError::structural(e.to_string()))
    }
}

/// Text body of one queue record
pub fn record_body(record: &Value) -> Result<&str, RelayError> {
    record
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| RelayError::structural("record has no string 'body'"))
}

/// Source of "today" for event stamps
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Host-local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Append the relay's tracking entries; nothing else in the document changes.
pub fn stamp_document(document: &mut Document, today: NaiveDate) -> Result<(), RelayError> {
    // Check both fields first so a failed stamp leaves the document untouched
    for field in [SERVICES_VISITED, EVENTS] {
        match document.get(field) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(RelayError::Malformed(format!("'{field}' is not an array")));
            }
            None => return Err(RelayError::structural(format!("document has no '{field}'"))),
        }
    }

    if let Some(Value::Array(services)) = document.get_mut(SERVICES_VISITED) {
        services.push(json!("lambda"));
        services.push(json!("sqs"));
    }
    if let Some(Value::Array(events)) = document.get_mut(EVENTS) {
        events.push(json!({ WRITING_RECURSION_EVENT: today.format("%Y-%m-%d").to_string() }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_stamp_appends_and_preserves() {
        let mut document: Document = serde_json::from_value(json!({
            "name": "hero",
            "services_visited": ["s3"],
            "events": [{"created": "2024-03-08"}],
            "inventory": {"gold": 3}
        }))
        .unwrap();

        stamp_document(&mut document, date()).unwrap();

        assert_eq!(
            Value::Object(document),
            json!({
                "name": "hero",
                "services_visited": ["s3", "lambda", "sqs"],
                "events": [{"created": "2024-03-08"}, {"s3WritingRecursion": "2024-03-09"}],
                "inventory": {"gold": 3}
            })
        );
    }

    #[test]
    fn test_stamp_keeps_field_order() {
        let mut document: Document =
            serde_json::from_str(r#"{"zeta":1,"services_visited":[],"alpha":2,"events":[]}"#)
                .unwrap();

        stamp_document(&mut document, date()).unwrap();

        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "services_visited", "alpha", "events"]);
    }

    #[test]
    fn test_stamp_missing_field_leaves_document_untouched() {
        let mut document: Document =
            serde_json::from_value(json!({"services_visited": ["s3"]})).unwrap();

        let err = stamp_document(&mut document, date()).unwrap_err();
        assert!(matches!(err, RelayError::Structural(_)));
        assert_eq!(document["services_visited"], json!(["s3"]));
    }

    #[test]
    fn test_stamp_rejects_non_array() {
        let mut document: Document =
            serde_json::from_value(json!({"services_visited": "s3", "events": []})).unwrap();

        let err = stamp_document(&mut document, date()).unwrap_err();
        assert!(matches!(err, RelayError::Malformed(_)));
        assert_eq!(document["events"], json!([]));
    }

    #[test]
    fn test_invocation_result_shape() {
        let result = InvocationResult::ok(&json!("Message processed successfully"));

        assert_eq!(result.body, "\"Message processed successfully\"");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"statusCode": 200, "body": "\"Message processed successfully\""})
        );
    }

    #[test]
    fn test_invocation_result_success() {
        assert!(InvocationResult::ok(&json!("ok")).is_success());
        assert!(!InvocationResult::bad_request(&json!({"error": "x"})).is_success());
        assert!(!InvocationResult::internal_error(&json!("x")).is_success());
    }

    #[test]
    fn test_storage_event_view() {
        let event = json!({
            "source": "aws.s3",
            "detail": {
                "bucket": {"name": "the-spicy-platypus-tiki-bar"},
                "object": {"key": "lobby/hero.json", "size": 120}
            }
        });

        let view = StorageEvent::from_event(&event).unwrap();
        assert_eq!(view.bucket(), "the-spicy-platypus-tiki-bar");
        assert_eq!(view.key(), "lobby/hero.json");

        let missing = json!({"detail": {"bucket": {"name": "b"}}});
        assert!(matches!(
            StorageEvent::from_event(&missing),
            Err(RelayError::Structural(_))
        ));
    }

    #[test]
    fn test_queue_event_view() {
        let event = json!({"Records": [{"body": "{}"}, {"messageId": "2"}]});

        let batch = QueueEvent::from_event(&event).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(record_body(&batch.records[0]).unwrap(), "{}");
        assert!(matches!(
            record_body(&batch.records[1]),
            Err(RelayError::Structural(_))
        ));

        assert!(QueueEvent::from_event(&json!({"records": []})).is_err());
    }
}
