use crate::{Entity, Fields, Record, RowLabeled, to_millis};
use rust_decimal::Decimal;
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle label of an order.
///
/// The known labels are the ones written by the kitchen and waitstaff boards, anything
/// else is preserved verbatim in `Other`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    Ready,
    Canceled,
    Other(String),
}

impl OrderStatus {
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Received => "RECEBIDO",
            OrderStatus::Preparing => "PREPARANDO",
            OrderStatus::Ready => "PRONTO",
            OrderStatus::Canceled => "CANCELADO",
            OrderStatus::Other(v) => v,
        }
    }

    /// Case insensitive, accepts the english labels as well.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "RECEBIDO" | "RECEIVED" => OrderStatus::Received,
            "PREPARANDO" | "PREPARING" => OrderStatus::Preparing,
            "PRONTO" | "READY" => OrderStatus::Ready,
            "CANCELADO" | "CANCELED" | "CANCELLED" => OrderStatus::Canceled,
            _ => OrderStatus::Other(label.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        *self == OrderStatus::Ready
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Empty until the store assigns one.
    pub id: String,
    pub store_id: Option<Uuid>,
    /// Dine in, delivery or takeaway, as chosen at checkout.
    pub order_type: String,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub items: serde_json::Value,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: OffsetDateTime,
    pub payment_method: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub change_for: Decimal,
    pub waitstaff_name: Option<String>,
    pub coupon_applied: Option<String>,
    pub discount_amount: Decimal,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            id: String::new(),
            store_id: None,
            order_type: String::new(),
            table_number: None,
            customer_name: None,
            customer_phone: None,
            items: serde_json::Value::Array(Vec::new()),
            status: OrderStatus::default(),
            total: Decimal::ZERO,
            created_at: OffsetDateTime::UNIX_EPOCH,
            payment_method: None,
            delivery_address: None,
            notes: None,
            change_for: Decimal::ZERO,
            waitstaff_name: None,
            coupon_applied: None,
            discount_amount: Decimal::ZERO,
        }
    }
}

impl Order {
    pub fn item_count(&self) -> usize {
        self.items.as_array().map(Vec::len).unwrap_or_default()
    }
}

impl Entity for Order {
    const TABLE: &'static str = "orders";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.text_or_default("id"),
            store_id: fields.uuid("store_id"),
            order_type: fields.text_or_default("type"),
            table_number: fields.text("tableNumber"),
            customer_name: fields.text("customerName"),
            customer_phone: fields.text("customerPhone"),
            items: fields.json_or("items", || serde_json::Value::Array(Vec::new())),
            status: fields
                .text("status")
                .map(|v| OrderStatus::parse(&v))
                .unwrap_or_default(),
            total: fields.decimal("total"),
            created_at: fields.timestamp("createdAt"),
            payment_method: fields.text("paymentMethod"),
            delivery_address: fields.text("deliveryAddress"),
            notes: fields.text("notes"),
            change_for: fields.decimal("changeFor"),
            waitstaff_name: fields.text("waitstaffName"),
            coupon_applied: fields.text("couponApplied"),
            discount_amount: fields.decimal("discountAmount"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        if !self.id.is_empty() {
            record.insert("id", &self.id);
        }
        if let Some(store_id) = self.store_id {
            record.insert("store_id", store_id);
        }
        record.insert("type", &self.order_type);
        for (column, value) in [
            ("tableNumber", &self.table_number),
            ("customerName", &self.customer_name),
            ("customerPhone", &self.customer_phone),
        ] {
            if let Some(value) = value {
                record.insert(column, value);
            }
        }
        record.insert("items", self.items.clone());
        record.insert("status", self.status.label());
        record.insert("total", self.total);
        record.insert("createdAt", to_millis(self.created_at));
        for (column, value) in [
            ("paymentMethod", &self.payment_method),
            ("deliveryAddress", &self.delivery_address),
            ("notes", &self.notes),
        ] {
            if let Some(value) = value {
                record.insert(column, value);
            }
        }
        record.insert("changeFor", self.change_for);
        for (column, value) in [
            ("waitstaffName", &self.waitstaff_name),
            ("couponApplied", &self.coupon_applied),
        ] {
            if let Some(value) = value {
                record.insert(column, value);
            }
        }
        record.insert("discountAmount", self.discount_amount);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Value, from_millis};
    use std::str::FromStr;

    #[test]
    fn status_labels() {
        assert_eq!(OrderStatus::parse("PRONTO"), OrderStatus::Ready);
        assert_eq!(OrderStatus::parse("ready"), OrderStatus::Ready);
        assert_eq!(OrderStatus::parse(" preparando "), OrderStatus::Preparing);
        assert_eq!(
            OrderStatus::parse("ENTREGUE"),
            OrderStatus::Other("ENTREGUE".into())
        );
        assert_eq!(OrderStatus::Canceled.to_string(), "CANCELADO");
        assert_eq!(OrderStatus::Other("X".into()).label(), "X");
    }

    #[test]
    fn mixed_casing_row() {
        let row: RowLabeled = Record::new()
            .set("id", 42)
            .set("store_id", "6f1c0c3e-5a52-4a53-9d5e-0e8f5b7b2a11")
            .set("type", "MESA")
            .set("tablenumber", "12")
            .set("customer_name", "Ana")
            .set("items", r#"[{"name":"Pizza","quantity":2}]"#)
            .set("status", "PREPARANDO")
            .set("total", "64.90")
            .set("createdat", "1717171717123")
            .set("discountAmount", Value::Decimal(None))
            .into();
        let order = Order::from_row(&row);
        assert_eq!(order.id, "42");
        assert_eq!(
            order.store_id,
            Uuid::parse_str("6f1c0c3e-5a52-4a53-9d5e-0e8f5b7b2a11").ok()
        );
        assert_eq!(order.order_type, "MESA");
        assert_eq!(order.table_number.as_deref(), Some("12"));
        assert_eq!(order.customer_name.as_deref(), Some("Ana"));
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.total, Decimal::from_str("64.90").unwrap());
        assert_eq!(order.created_at, from_millis(1_717_171_717_123));
        assert_eq!(order.discount_amount, Decimal::ZERO);
        assert_eq!(order.customer_phone, None);
    }

    #[test]
    fn empty_row_gives_defaults() {
        let order = Order::from_row(&Record::new().into());
        assert_eq!(order, Order::default());
    }

    #[test]
    fn mapping_is_idempotent() {
        let row: RowLabeled = Record::new()
            .set("id", 7)
            .set("type", "DELIVERY")
            .set("customername", "Bruno")
            .set("deliveryaddress", "Rua A, 10")
            .set("items", serde_json::json!([{"name": "Suco"}]))
            .set("status", "pronto")
            .set("total", 12.5)
            .set("changefor", "20")
            .set("createdat", 1_700_000_000_000_i64)
            .into();
        let once = Order::from_row(&row);
        let twice = Order::from_row(&once.to_record().into());
        assert_eq!(once, twice);
        assert_eq!(twice.status, OrderStatus::Ready);
        assert_eq!(twice.change_for, Decimal::from(20));
    }

    #[test]
    fn record_skips_missing_id() {
        let record = Order::default().to_record();
        assert!(record.get("id").is_none());
        assert!(record.get("store_id").is_none());
        assert_eq!(record.get("status"), Some(&Value::Varchar(Some("RECEBIDO".into()))));
    }
}
