use bytes::BytesMut;
use comanda_core::Value;
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use rust_decimal::Decimal;
use std::{error::Error, io::Read};
use uuid::Uuid;

/// Bridge between [`Value`] and the postgres wire types.
///
/// Parameters are converted to the type the server inferred for the placeholder, so a
/// textual id can be compared with an integer column and serialized json stored in a
/// `JSONB` one.
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl From<Value> for ValueHolder {
    fn from(value: Value) -> Self {
        ValueHolder(value)
    }
}

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, Some(raw))
    }
    fn from_sql_null(ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, None)
    }
    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&'a [u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        macro_rules! to_value {
            ($ty_var:ident, $raw:ident, $($($ty:path)|+ => ( $value:path, $source:ty ) ,)+) => {
                match *$ty_var {
                    $($($ty)|+ => $value(if let Some($raw) = $raw { Some(<$source>::from_sql($ty_var, $raw)?.into()) } else { None }),)+
                    _ => {
                        if let Some(mut raw) = $raw {
                            let mut buf = String::new();
                            let _ = raw.read_to_string(&mut buf);
                            return Err(comanda_core::Error::msg(format!("Cannot decode sql type: `{}`, value: `{}`", $ty_var, buf)).into());
                        }
                        Value::Null
                    }
                }
            };
        }
        let value = to_value!(ty, raw,
            Type::BOOL => (Value::Boolean, bool),
            Type::INT2 => (Value::Int32, i16),
            Type::INT4 => (Value::Int32, i32),
            Type::INT8 => (Value::Int64, i64),
            Type::FLOAT4 => (Value::Float64, f32),
            Type::FLOAT8 => (Value::Float64, f64),
            Type::NUMERIC => (Value::Decimal, Decimal),
            Type::VARCHAR
            | Type::TEXT
            | Type::NAME
            | Type::BPCHAR
            | Type::UNKNOWN => (Value::Varchar, String),
            Type::JSON | Type::JSONB => (Value::Json, serde_json::Value),
            Type::UUID => (Value::Uuid, Uuid),
        );
        Ok(value.into())
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn coerce<T>(
    value: &Value,
    ty: &Type,
    f: impl FnOnce(&Value) -> Option<T>,
) -> Result<Option<T>, Box<dyn Error + Sync + Send>> {
    if value.is_null() {
        return Ok(None);
    }
    match f(value) {
        Some(v) => Ok(Some(v)),
        None => Err(comanda_core::Error::msg(format!(
            "Cannot bind `{}` to a parameter of type `{}`",
            value, ty
        ))
        .into()),
    }
}

impl ToSql for ValueHolder {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>>
    where
        Self: Sized,
    {
        let value = &self.0;
        match *ty {
            Type::BOOL => coerce(value, ty, Value::as_bool)?.to_sql(ty, out),
            Type::INT2 => coerce(value, ty, |v| v.as_i64().and_then(|v| i16::try_from(v).ok()))?
                .to_sql(ty, out),
            Type::INT4 => coerce(value, ty, |v| v.as_i64().and_then(|v| i32::try_from(v).ok()))?
                .to_sql(ty, out),
            Type::INT8 => coerce(value, ty, Value::as_i64)?.to_sql(ty, out),
            Type::FLOAT4 => coerce(value, ty, |v| v.as_f64().map(|v| v as f32))?.to_sql(ty, out),
            Type::FLOAT8 => coerce(value, ty, Value::as_f64)?.to_sql(ty, out),
            Type::NUMERIC => coerce(value, ty, Value::as_decimal)?.to_sql(ty, out),
            Type::UUID => coerce(value, ty, Value::as_uuid)?.to_sql(ty, out),
            Type::JSON | Type::JSONB => coerce(value, ty, |v| match v {
                Value::Varchar(Some(v)) => serde_json::from_str(v).ok(),
                Value::Json(v) => v.clone(),
                Value::Boolean(Some(v)) => Some((*v).into()),
                Value::Int32(Some(v)) => Some((*v).into()),
                Value::Int64(Some(v)) => Some((*v).into()),
                Value::Float64(Some(v)) => Some((*v).into()),
                _ => None,
            })?
            .to_sql(ty, out),
            Type::VARCHAR | Type::TEXT | Type::NAME | Type::BPCHAR | Type::UNKNOWN => {
                coerce(value, ty, |v| v.as_text().map(|v| v.into_owned()))?.to_sql(ty, out)
            }
            _ => match value {
                Value::Null => None::<String>.to_sql(ty, out),
                Value::Boolean(v) => v.to_sql(ty, out),
                Value::Int32(v) => v.to_sql(ty, out),
                Value::Int64(v) => v.to_sql(ty, out),
                Value::Float64(v) => v.to_sql(ty, out),
                Value::Decimal(v) => v.to_sql(ty, out),
                Value::Varchar(v) => v.to_sql(ty, out),
                Value::Uuid(v) => v.to_sql(ty, out),
                Value::Json(v) => v.to_sql(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}
