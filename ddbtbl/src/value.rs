//! Dynamic Value type for store attribute values

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A dynamic attribute value as understood by the key-value store.
///
/// Numbers are carried as their decimal string representation, the same way
/// the store transmits them, so integer widths never leak into stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// String value (`S`)
    S(String),
    /// Number value (`N`), stored as a decimal string
    N(String),
    /// Binary value (`B`)
    B(Vec<u8>),
    /// List of values
    L(Vec<Value>),
    /// Map of named values
    M(BTreeMap<String, Value>),
}

/// Scalar types that may be used as key attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    /// String
    S,
    /// Number
    N,
    /// Binary
    B,
}

impl ScalarType {
    /// Parse a store-native type tag (`"S"`, `"N"`, `"B"`).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(ScalarType::S),
            "N" => Some(ScalarType::N),
            "B" => Some(ScalarType::B),
            _ => None,
        }
    }

    /// The store-native type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::S => "S",
            ScalarType::N => "N",
            ScalarType::B => "B",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::S(_) => "string",
            Value::N(_) => "number",
            Value::B(_) => "binary",
            Value::L(_) => "list",
            Value::M(_) => "map",
        }
    }

    /// The scalar type of this value, if it can serve as a key attribute.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::S(_) => Some(ScalarType::S),
            Value::N(_) => Some(ScalarType::N),
            Value::B(_) => Some(ScalarType::B),
            _ => None,
        }
    }

    /// Compare two scalar values the way the store orders range keys.
    ///
    /// Numbers compare numerically, strings and binaries byte-wise. Values
    /// of different scalar types are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::S(a), Value::S(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Value::B(a), Value::B(b)) => Some(a.cmp(b)),
            (Value::N(a), Value::N(b)) => compare_numbers(a, b),
            _ => None,
        }
    }
}

fn compare_numbers(a: &str, b: &str) -> Option<Ordering> {
    if let (Ok(a), Ok(b)) = (a.parse::<i128>(), b.parse::<i128>()) {
        return Some(a.cmp(&b));
    }
    let a: f64 = a.parse().ok()?;
    let b: f64 = b.parse().ok()?;
    a.partial_cmp(&b)
}

// Implement From for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::N(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::N(v.to_string())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::N(v.to_string())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::N(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::S(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::S(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::B(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::B(v.to_vec())
    }
}

// Implement From for Option<T> where T: Into<Value>
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
