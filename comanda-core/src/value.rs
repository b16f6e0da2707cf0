use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{borrow::Cow, fmt, str::FromStr};
use uuid::Uuid;

/// A single SQL scalar, either bound as a parameter or decoded from a row.
///
/// Every variant except `Null` carries an `Option`: `Varchar(None)` is a typed null,
/// `Null` is an untyped one. Both are reported by [`Value::is_null`].
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Uuid(Option<Uuid>),
    Json(Option<serde_json::Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::Json(v) => v.is_none(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(v) => v.map(i64::from),
            Value::Int32(v) => v.map(i64::from),
            Value::Int64(v) => *v,
            Value::Float64(Some(v)) if v.fract() == 0.0 => v.to_i64(),
            Value::Decimal(Some(v)) if v.fract().is_zero() => v.to_i64(),
            Value::Varchar(Some(v)) => {
                let v = v.trim();
                v.parse::<i64>().ok().or_else(|| {
                    Decimal::from_str(v)
                        .ok()
                        .filter(|d| d.fract().is_zero())
                        .and_then(|d| d.to_i64())
                })
            }
            Value::Json(Some(v)) => v.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => v.map(f64::from),
            Value::Int64(v) => v.and_then(|v| v.to_f64()),
            Value::Float64(v) => *v,
            Value::Decimal(v) => v.and_then(|v| v.to_f64()),
            Value::Varchar(Some(v)) => v.trim().parse().ok(),
            Value::Json(Some(v)) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int32(v) => v.map(Decimal::from),
            Value::Int64(v) => v.map(Decimal::from),
            Value::Float64(v) => v.and_then(Decimal::from_f64),
            Value::Decimal(v) => *v,
            Value::Varchar(Some(v)) => {
                let v = v.trim();
                Decimal::from_str(v)
                    .ok()
                    .or_else(|| Decimal::from_scientific(v).ok())
            }
            Value::Json(Some(serde_json::Value::Number(v))) => {
                v.as_i64().map(Decimal::from).or_else(|| v.as_f64().and_then(Decimal::from_f64))
            }
            Value::Json(Some(serde_json::Value::String(v))) => Decimal::from_str(v.trim()).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => *v,
            Value::Int32(Some(v)) => Some(*v != 0),
            Value::Int64(Some(v)) => Some(*v != 0),
            Value::Varchar(Some(v)) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Some(true),
                "false" | "f" | "0" => Some(false),
                _ => None,
            },
            Value::Json(Some(v)) => v.as_bool(),
            _ => None,
        }
    }

    /// Textual representation for the variants that have an unambiguous one.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Varchar(Some(v)) => Some(Cow::Borrowed(v)),
            Value::Int32(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Int64(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Float64(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Decimal(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Boolean(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Uuid(Some(v)) => Some(Cow::Owned(v.to_string())),
            Value::Json(Some(serde_json::Value::String(v))) => Some(Cow::Borrowed(v)),
            Value::Json(Some(v)) => Some(Cow::Owned(v.to_string())),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(v) => *v,
            Value::Varchar(Some(v)) => Uuid::parse_str(v.trim()).ok(),
            Value::Json(Some(serde_json::Value::String(v))) => Uuid::parse_str(v.trim()).ok(),
            _ => None,
        }
    }

    /// Structured content, parsing text when the store delivered it serialized.
    pub fn as_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Json(v) => v.clone(),
            Value::Varchar(Some(v)) => serde_json::from_str(v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(v) => f.write_str(&v),
            None => f.write_str("NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn typed_nulls() {
        assert!(Value::Null.is_null());
        assert!(Value::Varchar(None).is_null());
        assert!(Value::Json(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
    }

    #[test]
    fn numeric_coercion_from_text() {
        assert_eq!(Value::Varchar(Some(" 42 ".into())).as_i64(), Some(42));
        assert_eq!(Value::Varchar(Some("12.50".into())).as_i64(), None);
        assert_eq!(Value::Varchar(Some("12.9".into())).as_i64(), None);
        assert_eq!(Value::Varchar(Some("12.0".into())).as_i64(), Some(12));
        assert_eq!(
            Value::Varchar(Some("12.50".into())).as_decimal(),
            Some(Decimal::from_str("12.50").unwrap())
        );
        assert_eq!(Value::Varchar(Some("abc".into())).as_decimal(), None);
        assert_eq!(Value::Decimal(Some(Decimal::from(7))).as_i64(), Some(7));
        assert_eq!(Value::Int64(Some(3)).as_f64(), Some(3.0));
    }

    #[test]
    fn json_passthrough_and_parse() {
        let parsed = Value::Varchar(Some(r#"[{"qty":2}]"#.into())).as_json();
        assert_eq!(parsed, Some(serde_json::json!([{ "qty": 2 }])));
        let structured = Value::Json(Some(serde_json::json!({ "a": 1 }))).as_json();
        assert_eq!(structured, Some(serde_json::json!({ "a": 1 })));
        assert_eq!(Value::Varchar(Some("{not json".into())).as_json(), None);
    }

    #[test]
    fn text_forms() {
        let id = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
        assert_eq!(
            Value::Uuid(Some(id)).as_text().as_deref(),
            Some("5e915574-bb30-4430-98cf-c5854f61fbbd")
        );
        assert_eq!(Value::Int32(Some(15)).as_text().as_deref(), Some("15"));
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
