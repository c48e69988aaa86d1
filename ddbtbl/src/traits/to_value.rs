//! ToValue trait for converting Rust types to store values

use crate::value::Value;

/// Trait for types that can be converted to a store value.
///
/// This is implemented for the primitives that key attributes are built
/// from and can be manually implemented for custom types (e.g., enums).
pub trait ToValue {
    /// Convert this value to a store value.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value_number {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::N(self.to_string())
                }
            }
        )*
    };
}

impl_to_value_number!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::S(self.clone())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::S(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::S(self.to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::B(self.clone())
    }
}

impl ToValue for &[u8] {
    fn to_value(&self) -> Value {
        Value::B(self.to_vec())
    }
}

// Implement for Option<T>
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

// Implement for references
impl<T: ToValue> ToValue for &T {
    fn to_value(&self) -> Value {
        (*self).to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_become_decimal_strings() {
        assert_eq!(42i32.to_value(), Value::N("42".into()));
        assert_eq!((-7i64).to_value(), Value::N("-7".into()));
    }

    #[test]
    fn test_borrowed_forms() {
        let name = String::from("hoge");
        assert_eq!((&name).to_value(), Value::S("hoge".into()));
        assert_eq!("hoge".to_value(), Value::S("hoge".into()));
        let bytes: &[u8] = &[1, 2];
        assert_eq!(bytes.to_value(), Value::B(vec![1, 2]));
        assert_eq!(None::<i32>.to_value(), Value::Null);
    }
}
