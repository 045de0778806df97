//! Webhook ingestion and event queue
//!
//! POS webhooks are recorded into an [`EventQueue`] and later polled by a
//! reader filtering on the processed flag. Ingestion only rejects bodies
//! that are not well-formed; once a body is accepted, recording failures
//! are logged and the sender still gets an acknowledgement.

use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;
use uuid::Uuid;

/// Default number of events returned by a poll
pub const DEFAULT_POLL_LIMIT: usize = 50;

/// Upper bound on events returned by a single poll
pub const MAX_POLL_LIMIT: usize = 500;

/// A recorded webhook notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub id: Uuid,
    pub event: String,
    pub store_id: String,
    pub payload: Value,
    pub processed: bool,
    pub received_at: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn new(event: impl Into<String>, store_id: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event: event.into(),
            store_id: store_id.into(),
            payload,
            processed: false,
            received_at: Utc::now(),
        }
    }
}

/// Body shape accepted from the webhook sender
#[derive(Debug, Deserialize)]
struct WebhookBody {
    event: String,
    #[serde(rename = "storeId", alias = "shop_id", alias = "store_id")]
    store_id: String,
    #[serde(default)]
    data: Value,
}

/// Acknowledgement returned to the webhook sender
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub success: bool,
    pub event_id: Uuid,
    /// Whether the event actually reached the queue
    #[serde(skip)]
    pub recorded: bool,
}

/// Sink and source of webhook events
pub trait EventQueue: Send + Sync {
    fn record(&self, event: WebhookEvent) -> Result<()>;

    /// Events with the given processed flag, oldest first, at most `limit`
    fn fetch(&self, processed: bool, limit: usize) -> Result<Vec<WebhookEvent>>;

    /// Flag an event as processed; returns whether it was found
    fn mark_processed(&self, id: Uuid) -> Result<bool>;
}

/// In-process queue. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryEventQueue {
    events: RwLock<Vec<WebhookEvent>>,
}

impl MemoryEventQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventQueue for MemoryEventQueue {
    fn record(&self, event: WebhookEvent) -> Result<()> {
        let mut events = self
            .events
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))?;
        events.push(event);
        Ok(())
    }

    fn fetch(&self, processed: bool, limit: usize) -> Result<Vec<WebhookEvent>> {
        let events = self
            .events
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {}", e)))?;

        let mut matching: Vec<_> = events
            .iter()
            .filter(|e| e.processed == processed)
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.received_at);
        matching.truncate(limit);
        Ok(matching)
    }

    fn mark_processed(&self, id: Uuid) -> Result<bool> {
        let mut events = self
            .events
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        match events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.processed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Accept a raw webhook body and record it.
///
/// Fails only when `body` is not a well-formed webhook notification.
pub fn ingest(queue: &dyn EventQueue, body: &str) -> Result<WebhookAck> {
    let parsed: WebhookBody = serde_json::from_str(body)?;
    let event = WebhookEvent::new(parsed.event, parsed.store_id, parsed.data);
    let event_id = event.id;

    tracing::info!(event = %event.event, store_id = %event.store_id, "Received webhook");

    let recorded = match queue.record(event) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(event_id = %event_id, "Failed to record webhook event: {}", e);
            false
        }
    };

    Ok(WebhookAck {
        success: true,
        event_id,
        recorded,
    })
}

/// Read events for the polling endpoint. `limit` defaults to
/// [`DEFAULT_POLL_LIMIT`] and is capped at [`MAX_POLL_LIMIT`].
pub fn poll(queue: &dyn EventQueue, processed: bool, limit: Option<usize>) -> Result<Vec<WebhookEvent>> {
    let limit = limit.unwrap_or(DEFAULT_POLL_LIMIT).min(MAX_POLL_LIMIT);
    queue.fetch(processed, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct BrokenQueue;

    impl EventQueue for BrokenQueue {
        fn record(&self, _event: WebhookEvent) -> Result<()> {
            Err(StoreError::Backend("insert failed".into()))
        }

        fn fetch(&self, _processed: bool, _limit: usize) -> Result<Vec<WebhookEvent>> {
            Ok(Vec::new())
        }

        fn mark_processed(&self, _id: Uuid) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_ingest_records_event() {
        let queue = MemoryEventQueue::new();
        let body = json!({
            "event": "order.created",
            "storeId": "shop-42",
            "data": {"orderId": "o-1", "total": 250000}
        });

        let ack = ingest(&queue, &body.to_string()).unwrap();
        assert!(ack.success);
        assert!(ack.recorded);

        let pending = poll(&queue, false, None).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, ack.event_id);
        assert_eq!(pending[0].event, "order.created");
        assert_eq!(pending[0].store_id, "shop-42");
        assert_eq!(pending[0].payload["orderId"], "o-1");
    }

    #[test]
    fn test_ingest_accepts_shop_id_alias() {
        let queue = MemoryEventQueue::new();
        let ack = ingest(&queue, r#"{"event":"product.updated","shop_id":"s1"}"#).unwrap();
        assert!(ack.recorded);

        let pending = poll(&queue, false, None).unwrap();
        assert_eq!(pending[0].store_id, "s1");
        assert_eq!(pending[0].payload, Value::Null);
    }

    #[test]
    fn test_ingest_rejects_malformed_body() {
        let queue = MemoryEventQueue::new();
        assert!(matches!(ingest(&queue, "not json"), Err(StoreError::Serialization(_))));
        assert!(matches!(
            ingest(&queue, r#"{"storeId":"s1"}"#),
            Err(StoreError::Serialization(_))
        ));
        assert!(poll(&queue, false, None).unwrap().is_empty());
    }

    #[test]
    fn test_ingest_swallows_record_failure() {
        let ack = ingest(&BrokenQueue, r#"{"event":"order.created","storeId":"s1"}"#).unwrap();
        assert!(ack.success);
        assert!(!ack.recorded);

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("recorded").is_none());
    }

    #[test]
    fn test_poll_filters_and_limits() {
        let queue = MemoryEventQueue::new();
        for i in 0..5 {
            queue
                .record(WebhookEvent::new("order.created", "s1", json!({ "n": i })))
                .unwrap();
        }

        let first = poll(&queue, false, Some(2)).unwrap();
        assert_eq!(first.len(), 2);
        assert!(queue.mark_processed(first[0].id).unwrap());
        assert!(!queue.mark_processed(Uuid::new_v4()).unwrap());

        assert_eq!(poll(&queue, false, None).unwrap().len(), 4);
        let done = poll(&queue, true, None).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, first[0].id);
    }

    #[test]
    fn test_poll_limit_is_capped() {
        let queue = MemoryEventQueue::new();
        for _ in 0..(MAX_POLL_LIMIT + 10) {
            queue.record(WebhookEvent::new("ping", "s1", Value::Null)).unwrap();
        }
        assert_eq!(poll(&queue, false, Some(10_000)).unwrap().len(), MAX_POLL_LIMIT);
    }
}
