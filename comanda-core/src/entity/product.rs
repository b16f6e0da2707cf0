use crate::{Entity, Fields, Record, RowLabeled};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub store_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: String,
    pub is_active: bool,
    /// Day of the week (0 is sunday) the product is featured on.
    pub featured_day: Option<i32>,
    /// Priced per kilogram.
    pub is_by_weight: bool,
    pub barcode: Option<String>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            store_id: None,
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            category: String::new(),
            image_url: String::new(),
            is_active: true,
            featured_day: None,
            is_by_weight: false,
            barcode: None,
        }
    }
}

impl Entity for Product {
    const TABLE: &'static str = "products";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.text_or_default("id"),
            store_id: fields.uuid("store_id"),
            name: fields.text_or_default("name"),
            description: fields.text_or_default("description"),
            price: fields.decimal("price"),
            category: fields.text_or_default("category"),
            image_url: fields.text_or_default("imageUrl"),
            is_active: fields.bool_or("isActive", true),
            featured_day: fields.i32("featuredDay"),
            is_by_weight: fields.bool_or("isByWeight", false),
            barcode: fields.text("barcode"),
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
        record.insert("name", &self.name);
        record.insert("description", &self.description);
        record.insert("price", self.price);
        record.insert("category", &self.category);
        record.insert("imageUrl", &self.image_url);
        record.insert("isActive", self.is_active);
        if let Some(day) = self.featured_day {
            record.insert("featuredDay", day);
        }
        record.insert("isByWeight", self.is_by_weight);
        if let Some(barcode) = &self.barcode {
            record.insert("barcode", barcode);
        }
        record
    }
}
