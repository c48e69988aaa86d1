//! Metadata structures for table definitions
//!
//! `Raw*` types mirror the definition source exactly as decoded. The other
//! types form the validated schema model that generators consume; they can
//! only be built by [`super::validate`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical attribute types a definition may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    String,
    Int,
    Int64,
    Bytes,
}

impl AttrType {
    /// Parse a type name as written in a definition (`string`, `int`, `int64`, `bytes`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(AttrType::String),
            "int" => Some(AttrType::Int),
            "int64" => Some(AttrType::Int64),
            "bytes" => Some(AttrType::Bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::String => "string",
            AttrType::Int => "int",
            AttrType::Int64 => "int64",
            AttrType::Bytes => "bytes",
        }
    }

    /// The store-native type tag. `int` and `int64` share `N`.
    pub fn native_type(&self) -> NativeType {
        match self {
            AttrType::String => NativeType::S,
            AttrType::Int | AttrType::Int64 => NativeType::N,
            AttrType::Bytes => NativeType::B,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-native scalar type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NativeType {
    S,
    N,
    B,
}

impl NativeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeType::S => "S",
            NativeType::N => "N",
            NativeType::B => "B",
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute as written in the definition source.
///
/// Both fields blank is the empty attribute, meaning "no sort key".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttrDef {
    #[serde(default)]
    pub attr_name: String,
    #[serde(default)]
    pub attr_type: String,
}

impl RawAttrDef {
    pub fn new(name: &str, attr_type: &str) -> Self {
        Self {
            attr_name: name.to_string(),
            attr_type: attr_type.to_string(),
        }
    }

    /// Check if this is the empty attribute
    pub fn is_empty(&self) -> bool {
        self.attr_name.is_empty() && self.attr_type.is_empty()
    }
}

/// An index key shape as written in the definition source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndexDef {
    #[serde(default)]
    pub pk: RawAttrDef,
    #[serde(default)]
    pub sk: RawAttrDef,
}

/// A named secondary index in list form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSecondaryIndexDef {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub index: RawIndexDef,
}

/// Secondary indexes in either of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSecondaryIndexes {
    /// Ordered list of `{name, pk, sk}` records
    List(Vec<RawSecondaryIndexDef>),
    /// Map keyed by index name
    Map(BTreeMap<String, RawIndexDef>),
}

impl Default for RawSecondaryIndexes {
    fn default() -> Self {
        RawSecondaryIndexes::List(Vec::new())
    }
}

impl RawSecondaryIndexes {
    /// Flatten into list form. Map entries come out in name order.
    pub fn to_list(&self) -> Vec<RawSecondaryIndexDef> {
        match self {
            RawSecondaryIndexes::List(list) => list.clone(),
            RawSecondaryIndexes::Map(map) => map
                .iter()
                .map(|(name, index)| RawSecondaryIndexDef {
                    name: name.clone(),
                    index: index.clone(),
                })
                .collect(),
        }
    }
}

/// One table definition as decoded from the definition source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTableDef {
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub primary_index: RawIndexDef,
    #[serde(default)]
    pub secondary_indexes: RawSecondaryIndexes,
    #[serde(default)]
    pub stream_enabled: bool,
}

/// A validated attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttrDef {
    /// Attribute name as stored
    pub name: String,
    pub attr_type: AttrType,
}

impl AttrDef {
    pub fn new(name: &str, attr_type: AttrType) -> Self {
        Self {
            name: name.to_string(),
            attr_type,
        }
    }
}

/// A validated hash key with an optional range key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDef {
    pub pk: AttrDef,
    pub sk: Option<AttrDef>,
}

impl IndexDef {
    pub fn simple(pk: AttrDef) -> Self {
        Self { pk, sk: None }
    }

    pub fn composite(pk: AttrDef, sk: AttrDef) -> Self {
        Self { pk, sk: Some(sk) }
    }

    /// Check if this index has only a hash component
    pub fn is_simple(&self) -> bool {
        self.sk.is_none()
    }

    /// The key attributes, hash first.
    pub fn attrs(&self) -> impl Iterator<Item = &AttrDef> {
        std::iter::once(&self.pk).chain(self.sk.as_ref())
    }
}

/// A validated, named secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryIndexDef {
    pub name: String,
    pub index: IndexDef,
}

/// A validated table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDef {
    /// Table name as stored
    pub name: String,
    pub primary_index: IndexDef,
    pub secondary_indexes: Vec<SecondaryIndexDef>,
    pub stream_enabled: bool,
}

impl TableDef {
    /// Every key attribute of the table in declaration order: primary pk,
    /// primary sk, then each secondary index's pk and sk. May repeat.
    pub fn key_attrs(&self) -> impl Iterator<Item = &AttrDef> {
        self.primary_index
            .attrs()
            .chain(self.secondary_indexes.iter().flat_map(|s| s.index.attrs()))
    }
}
