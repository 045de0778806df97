//! POS synchronization contracts
//!
//! Shapes exchanged with the point-of-sale backend. Nothing in this
//! workspace performs synchronization yet; these types fix the contract a
//! sync engine reads (products, orders) and reports (`SyncResult`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sellable product variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub retail_price: f64,
    pub remain_quantity: i64,
    #[serde(default)]
    pub fields: Vec<VariantField>,
}

/// One attribute of a variant, e.g. size or color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub variations: Vec<ProductVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

impl OrderItem {
    /// Line total after discount
    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity) - self.discount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Confirmed,
    Packing,
    Shipped,
    Delivered,
    Returned,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_fee: f64,
    #[serde(default)]
    pub total_discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub inserted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of line totals plus shipping minus order-level discount
    pub fn total(&self) -> f64 {
        let items: f64 = self.items.iter().map(OrderItem::total).sum();
        items + self.shipping_fee - self.total_discount
    }
}

/// A per-item failure recorded during a sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItemError {
    pub item_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome counters of one sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub errors: Vec<SyncItemError>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl SyncResult {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            processed: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            errors: Vec::new(),
            duration_ms: 0,
            timestamp: now,
        }
    }

    pub fn record_error(&mut self, item_id: impl Into<String>, message: impl Into<String>) {
        self.processed += 1;
        self.errors.push(SyncItemError {
            item_id: item_id.into(),
            message: message.into(),
            code: None,
        });
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "o-1",
                "status": "confirmed",
                "customer": {"name": "Nguyễn Văn A"},
                "items": [
                    {"productId": "p1", "name": "Áo", "quantity": 2, "price": 150000},
                    {"productId": "p2", "name": "Quần", "quantity": 1, "price": 200000, "discount": 20000}
                ],
                "shippingFee": 30000,
                "totalDiscount": 10000,
                "insertedAt": "2024-05-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total(), 300000.0 + 180000.0 + 30000.0 - 10000.0);
    }

    #[test]
    fn test_sync_result_errors() {
        let mut result = SyncResult::empty(Utc::now());
        assert!(result.is_success());

        result.record_error("p-9", "missing price");
        assert!(!result.is_success());
        assert_eq!(result.processed, 1);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errors"][0]["itemId"], "p-9");
        assert!(json.get("durationMs").is_some());
    }
}
