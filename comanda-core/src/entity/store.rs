use crate::{Entity, Fields, Record, RowLabeled, to_millis};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_PRIMARY_COLOR: &str = "#001F3F";
pub const DEFAULT_SECONDARY_COLOR: &str = "#FFD700";

/// A tenant of the platform, addressed by its slug.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreProfile {
    pub id: Option<Uuid>,
    pub slug: String,
    pub name: String,
    pub logo_url: String,
    pub address: String,
    pub whatsapp: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    /// Free form settings: theme colors, opening hours, delivery fees and the like.
    pub settings: serde_json::Value,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            id: None,
            slug: String::new(),
            name: String::new(),
            logo_url: String::new(),
            address: String::new(),
            whatsapp: String::new(),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            settings: serde_json::Value::Object(Default::default()),
        }
    }
}

impl StoreProfile {
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    pub fn primary_color(&self) -> &str {
        self.setting("primaryColor")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(DEFAULT_PRIMARY_COLOR)
    }

    pub fn secondary_color(&self) -> &str {
        self.setting("secondaryColor")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(DEFAULT_SECONDARY_COLOR)
    }
}

impl Entity for StoreProfile {
    const TABLE: &'static str = "store_profiles";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.uuid("id"),
            slug: fields.text_or_default("slug"),
            name: fields.text_or_default("name"),
            logo_url: fields.text_or_default("logoUrl"),
            address: fields.text_or_default("address"),
            whatsapp: fields.text_or_default("whatsapp"),
            is_active: fields.bool_or("isActive", true),
            created_at: fields.timestamp("createdAt"),
            settings: fields
                .json_or("settings", || serde_json::Value::Object(Default::default())),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        if let Some(id) = self.id {
            record.insert("id", id);
        }
        record.insert("slug", &self.slug);
        record.insert("name", &self.name);
        record.insert("logoUrl", &self.logo_url);
        record.insert("address", &self.address);
        record.insert("whatsapp", &self.whatsapp);
        record.insert("isActive", self.is_active);
        record.insert("createdAt", to_millis(self.created_at));
        record.insert("settings", self.settings.clone());
        record
    }
}
