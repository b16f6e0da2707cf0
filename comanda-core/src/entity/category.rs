use crate::{Entity, Fields, Record, RowLabeled};
use uuid::Uuid;

/// Menu section, unique by name within a store.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub store_id: Option<Uuid>,
    pub name: String,
}

impl Entity for Category {
    const TABLE: &'static str = "categories";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.text_or_default("id"),
            store_id: fields.uuid("store_id"),
            name: fields.text_or_default("name"),
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
        record
    }
}
