//! Keys and range-key conditions

use crate::traits::{Item, ToValue};
use crate::value::Value;

/// A named key attribute bound to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyAttr {
    /// Attribute name as stored
    pub name: String,
    /// Bound value
    pub value: Value,
}

impl KeyAttr {
    /// Bind `value` to the attribute `name`.
    pub fn new(name: impl Into<String>, value: impl ToValue) -> Self {
        Self {
            name: name.into(),
            value: value.to_value(),
        }
    }

    /// Check whether `item` carries this attribute with this exact value.
    pub fn matches(&self, item: &Item) -> bool {
        item.get(&self.name) == Some(&self.value)
    }
}

/// A fully resolved key: a hash attribute and, for composite keys, a range attribute.
///
/// Keys compare and hash on names and values, so two keys are equal exactly
/// when they address the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// Hash (partition) key
    pub hash: KeyAttr,
    /// Range (sort) key, absent for simple keys
    pub range: Option<KeyAttr>,
}

impl Key {
    /// A simple key bound to a hash attribute only.
    pub fn hash(name: impl Into<String>, value: impl ToValue) -> Self {
        Self {
            hash: KeyAttr::new(name, value),
            range: None,
        }
    }

    /// A composite key bound to both hash and range attributes.
    pub fn composite(
        hash_name: impl Into<String>,
        hash_value: impl ToValue,
        range_name: impl Into<String>,
        range_value: impl ToValue,
    ) -> Self {
        Self {
            hash: KeyAttr::new(hash_name, hash_value),
            range: Some(KeyAttr::new(range_name, range_value)),
        }
    }

    /// Check if this key has a range component
    pub fn is_composite(&self) -> bool {
        self.range.is_some()
    }

    /// Check whether `item` is addressed by this key.
    pub fn matches(&self, item: &Item) -> bool {
        self.hash.matches(item) && self.range.as_ref().map_or(true, |r| r.matches(item))
    }

    /// The key attributes as a bare item.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(self.hash.name.clone(), self.hash.value.clone());
        if let Some(range) = &self.range {
            item.insert(range.name.clone(), range.value.clone());
        }
        item
    }
}

/// Comparison operators for range-key conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// Prefix match on strings and binaries
    BeginsWith,
}

impl Operator {
    /// The operator as written in store condition expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::BeginsWith => "begins_with",
        }
    }

    /// Evaluate `lhs <op> rhs`. Values of different scalar types never match.
    pub fn evaluate(&self, lhs: &Value, rhs: &Value) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};

        if let Operator::BeginsWith = self {
            return match (lhs, rhs) {
                (Value::S(l), Value::S(r)) => l.starts_with(r.as_str()),
                (Value::B(l), Value::B(r)) => l.starts_with(r),
                _ => false,
            };
        }

        match (self, lhs.compare(rhs)) {
            (_, None) => false,
            (Operator::Equal, Some(ord)) => ord == Equal,
            (Operator::Less, Some(ord)) => ord == Less,
            (Operator::LessOrEqual, Some(ord)) => ord != Greater,
            (Operator::Greater, Some(ord)) => ord == Greater,
            (Operator::GreaterOrEqual, Some(ord)) => ord != Less,
            (Operator::BeginsWith, Some(_)) => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate on a range key attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCondition {
    /// Range attribute name
    pub name: String,
    pub op: Operator,
    /// Right-hand operand
    pub value: Value,
}

impl RangeCondition {
    pub fn new(name: impl Into<String>, op: Operator, value: impl ToValue) -> Self {
        Self {
            name: name.into(),
            op,
            value: value.to_value(),
        }
    }

    /// Check whether `item` satisfies the condition. Items without the
    /// attribute never do.
    pub fn matches(&self, item: &Item) -> bool {
        item.get(&self.name)
            .map_or(false, |v| self.op.evaluate(v, &self.value))
    }
}
