use crate::{Entity, Fields, Record, RowLabeled};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffRole {
    /// Full access to the admin dashboard.
    Manager,
    Staff(String),
}

impl Default for StaffRole {
    fn default() -> Self {
        StaffRole::Staff(String::new())
    }
}

impl StaffRole {
    pub fn label(&self) -> &str {
        match self {
            StaffRole::Manager => "GERENTE",
            StaffRole::Staff(v) => v,
        }
    }

    pub fn parse(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "GERENTE" | "MANAGER" => StaffRole::Manager,
            _ => StaffRole::Staff(label.to_string()),
        }
    }

    pub fn is_manager(&self) -> bool {
        *self == StaffRole::Manager
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimal identity of a staff member, the secret is never part of it.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl Entity for Identity {
    const TABLE: &'static str = "waitstaff";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.text_or_default("id"),
            name: fields.text_or_default("name"),
            role: fields
                .text("role")
                .map(|v| StaffRole::parse(&v))
                .unwrap_or_default(),
        }
    }

    fn to_record(&self) -> Record {
        Record::new()
            .set("id", &self.id)
            .set("name", &self.name)
            .set("role", self.role.label())
    }
}

/// A staff member as stored, secret included. Written by the admin dashboard.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub name: String,
    pub password: String,
    pub role: StaffRole,
}

impl Entity for StaffMember {
    const TABLE: &'static str = "waitstaff";

    fn from_row(row: &RowLabeled) -> Self {
        let fields = Fields(row);
        Self {
            id: fields.uuid("id"),
            store_id: fields.uuid("store_id"),
            name: fields.text_or_default("name"),
            password: fields.text_or_default("password"),
            role: fields
                .text("role")
                .map(|v| StaffRole::parse(&v))
                .unwrap_or_default(),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        if let Some(id) = self.id {
            record.insert("id", id);
        }
        if let Some(store_id) = self.store_id {
            record.insert("store_id", store_id);
        }
        record.insert("name", &self.name);
        record.insert("password", &self.password);
        record.insert("role", self.role.label());
        record
    }
}
