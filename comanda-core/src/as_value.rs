use crate::Value;
use rust_decimal::Decimal;
use std::borrow::Cow;
use uuid::Uuid;

/// Conversion of Rust values into a bindable [`Value`].
pub trait AsValue {
    fn as_empty_value() -> Value
    where
        Self: Sized;
    fn as_value(self) -> Value;
}

macro_rules! impl_as_value {
    ($source:ty, $into:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $into(None)
            }
            fn as_value(self) -> Value {
                $into(Some(self.into()))
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean);
impl_as_value!(i8, Value::Int32);
impl_as_value!(i16, Value::Int32);
impl_as_value!(i32, Value::Int32);
impl_as_value!(u8, Value::Int32);
impl_as_value!(u16, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(u32, Value::Int64);
impl_as_value!(f32, Value::Float64);
impl_as_value!(f64, Value::Float64);
impl_as_value!(Decimal, Value::Decimal);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Uuid, Value::Uuid);
impl_as_value!(serde_json::Value, Value::Json);

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_owned()))
    }
}

impl AsValue for &String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.clone()))
    }
}

impl AsValue for Cow<'_, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
}

impl AsValue for &Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self.clone()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
}

impl<T: AsValue + Copy> AsValue for &Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Self {
                value.as_value()
            }
        })+
    };
}
impl_from_scalar!(
    bool,
    i8,
    i16,
    i32,
    u8,
    u16,
    i64,
    u32,
    f32,
    f64,
    Decimal,
    String,
    Uuid,
    serde_json::Value,
    &str,
);
