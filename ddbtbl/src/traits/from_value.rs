//! FromValue trait for converting store values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;

/// Trait for types that can be constructed from a store value.
///
/// This is implemented for the primitives that key attributes are built
/// from and can be manually implemented for custom types (e.g., enums).
pub trait FromValue: Sized {
    /// Convert a store value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            _ => Err(Error::TypeConversion {
                expected: "bool",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

macro_rules! impl_from_value_number {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::N(s) => s.parse::<$t>().map_err(|_| Error::TypeConversion {
                            expected: stringify!($t),
                            actual: format!("number({}) out of range", s),
                        }),
                        _ => Err(Error::TypeConversion {
                            expected: stringify!($t),
                            actual: value.type_name().to_string(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_from_value_number!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::S(v) => Ok(v),
            _ => Err(Error::TypeConversion {
                expected: "String",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::B(v) => Ok(v),
            _ => Err(Error::TypeConversion {
                expected: "Vec<u8>",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_parsing() {
        assert_eq!(i32::from_value(Value::N("12".into())).unwrap(), 12);
        assert_eq!(i64::from_value(Value::N("-3".into())).unwrap(), -3);
        assert!(i8::from_value(Value::N("300".into())).is_err());
        assert!(i32::from_value(Value::S("12".into())).is_err());
    }

    #[test]
    fn test_option() {
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(Value::S("a".into())).unwrap(),
            Some("a".to_string())
        );
    }
}
