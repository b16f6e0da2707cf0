mod category;
mod order;
mod product;
mod staff;
mod store;

pub use category::*;
pub use order::*;
pub use product::*;
pub use staff::*;
pub use store::*;

use crate::{Record, RowLabeled, Value};
use convert_case::{Case, Casing};
use rust_decimal::Decimal;
use std::borrow::Cow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A domain type stored in a table.
///
/// `from_row` is total: missing or malformed columns fall back to the type defaults, it
/// never fails. `to_record` produces the canonical shape, and mapping it back yields the
/// same entity.
pub trait Entity: Sized {
    const TABLE: &'static str;

    fn from_row(row: &RowLabeled) -> Self;

    fn to_record(&self) -> Record;
}

/// Names under which a declared field can show up in a row, in order of preference:
/// the declared name, its lower case form (unquoted identifiers folded by the store), its
/// snake case form.
pub fn field_names(name: &str) -> [Cow<'_, str>; 3] {
    [
        Cow::Borrowed(name),
        Cow::Owned(name.to_lowercase()),
        Cow::Owned(name.to_case(Case::Snake)),
    ]
}

/// Typed access to the fields of a row with unpredictable key casing.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'r>(pub &'r RowLabeled);

impl<'r> Fields<'r> {
    /// First non null value among the names of [`field_names`].
    pub fn get(&self, name: &str) -> Option<&'r Value> {
        field_names(name)
            .iter()
            .find_map(|candidate| self.0.get_column(candidate).filter(|v| !v.is_null()))
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(Value::as_text)
            .map(Cow::into_owned)
    }

    pub fn text_or_default(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn i32(&self, name: &str) -> Option<i32> {
        self.i64(name).and_then(|v| i32::try_from(v).ok())
    }

    pub fn decimal(&self, name: &str) -> Decimal {
        self.get(name)
            .and_then(Value::as_decimal)
            .unwrap_or_default()
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn uuid(&self, name: &str) -> Option<Uuid> {
        self.get(name).and_then(Value::as_uuid)
    }

    pub fn json_or(
        &self,
        name: &str,
        default: impl FnOnce() -> serde_json::Value,
    ) -> serde_json::Value {
        self.get(name)
            .and_then(Value::as_json)
            .unwrap_or_else(default)
    }

    /// Epoch milliseconds.
    pub fn timestamp(&self, name: &str) -> OffsetDateTime {
        self.i64(name)
            .map(from_millis)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

pub fn from_millis(millis: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn to_millis(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, Value)]) -> RowLabeled {
        fields.iter().cloned().collect::<Record>().into()
    }

    #[test]
    fn candidate_names() {
        let names = field_names("createdAt");
        assert_eq!(names[0], "createdAt");
        assert_eq!(names[1], "createdat");
        assert_eq!(names[2], "created_at");
    }

    #[test]
    fn resolution_order() {
        let all = row(&[
            ("created_at", Value::Int64(Some(3))),
            ("createdat", Value::Int64(Some(2))),
            ("createdAt", Value::Int64(Some(1))),
        ]);
        assert_eq!(Fields(&all).i64("createdAt"), Some(1));
        let folded = row(&[
            ("created_at", Value::Int64(Some(3))),
            ("createdat", Value::Int64(Some(2))),
        ]);
        assert_eq!(Fields(&folded).i64("createdAt"), Some(2));
        let snake = row(&[("created_at", Value::Int64(Some(3)))]);
        assert_eq!(Fields(&snake).i64("createdAt"), Some(3));
    }

    #[test]
    fn null_does_not_shadow() {
        let row = row(&[
            ("tableNumber", Value::Varchar(None)),
            ("tablenumber", Value::Varchar(Some("7".into()))),
        ]);
        assert_eq!(Fields(&row).text("tableNumber").as_deref(), Some("7"));
    }

    #[test]
    fn defaults_for_missing() {
        let row = row(&[]);
        let fields = Fields(&row);
        assert_eq!(fields.text_or_default("name"), "");
        assert_eq!(fields.decimal("total"), Decimal::ZERO);
        assert!(fields.bool_or("isActive", true));
        assert_eq!(fields.json_or("items", || serde_json::json!([])), serde_json::json!([]));
        assert_eq!(fields.timestamp("createdAt"), OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn millis_round_trip() {
        let at = from_millis(1_717_171_717_123);
        assert_eq!(to_millis(at), 1_717_171_717_123);
    }
}
