//! Table key schemas, as provisioned in a store

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::key::{Key, KeyAttr};
use crate::traits::Item;
use crate::value::ScalarType;

/// A key attribute declaration: name and scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: String,
    pub scalar_type: ScalarType,
}

impl AttrSpec {
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
        }
    }
}

/// The key shape of a table or secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub hash: AttrSpec,
    pub range: Option<AttrSpec>,
}

impl KeySpec {
    /// A hash-only key.
    pub fn simple(hash: AttrSpec) -> Self {
        Self { hash, range: None }
    }

    /// A hash-and-range key.
    pub fn composite(hash: AttrSpec, range: AttrSpec) -> Self {
        Self {
            hash,
            range: Some(range),
        }
    }

    /// Check that `key` names exactly this key's attributes with values of
    /// the declared types.
    pub fn check_key(&self, key: &Key) -> Result<()> {
        check_attr(&self.hash, &key.hash)?;
        match (&self.range, &key.range) {
            (None, None) => Ok(()),
            (Some(spec), Some(attr)) => check_attr(spec, attr),
            (Some(spec), None) => Err(Error::Validation(format!(
                "key is missing range attribute `{}`",
                spec.name
            ))),
            (None, Some(attr)) => Err(Error::Validation(format!(
                "key has unexpected range attribute `{}`",
                attr.name
            ))),
        }
    }

    /// Extract the key addressing `item`.
    pub fn key_of(&self, item: &Item) -> Result<Key> {
        let hash = extract_attr(&self.hash, item)?;
        let range = self
            .range
            .as_ref()
            .map(|spec| extract_attr(spec, item))
            .transpose()?;
        Ok(Key { hash, range })
    }

    /// Check whether `item` carries every attribute of this key.
    ///
    /// Items lacking an index key attribute are absent from that index.
    pub fn covers(&self, item: &Item) -> bool {
        item.contains_key(&self.hash.name)
            && self
                .range
                .as_ref()
                .map_or(true, |r| item.contains_key(&r.name))
    }

    /// Check the types of whichever key attributes `item` carries.
    pub fn check_types(&self, item: &Item) -> Result<()> {
        for spec in std::iter::once(&self.hash).chain(self.range.as_ref()) {
            if let Some(value) = item.get(&spec.name) {
                if value.scalar_type() != Some(spec.scalar_type) {
                    return Err(type_mismatch(spec, value.type_name()));
                }
            }
        }
        Ok(())
    }
}

fn check_attr(spec: &AttrSpec, attr: &KeyAttr) -> Result<()> {
    if spec.name != attr.name {
        return Err(Error::Validation(format!(
            "expected key attribute `{}`, got `{}`",
            spec.name, attr.name
        )));
    }
    if attr.value.scalar_type() != Some(spec.scalar_type) {
        return Err(type_mismatch(spec, attr.value.type_name()));
    }
    Ok(())
}

fn extract_attr(spec: &AttrSpec, item: &Item) -> Result<KeyAttr> {
    let value = item
        .get(&spec.name)
        .ok_or_else(|| Error::Validation(format!("item is missing key attribute `{}`", spec.name)))?;
    if value.scalar_type() != Some(spec.scalar_type) {
        return Err(type_mismatch(spec, value.type_name()));
    }
    Ok(KeyAttr {
        name: spec.name.clone(),
        value: value.clone(),
    })
}

fn type_mismatch(spec: &AttrSpec, actual: &str) -> Error {
    Error::Validation(format!(
        "key attribute `{}` must be of type {}, got {}",
        spec.name, spec.scalar_type, actual
    ))
}

/// A secondary index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub key: KeySpec,
}

/// Everything a store needs to provision a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub key: KeySpec,
    pub indexes: Vec<IndexSpec>,
    pub stream_enabled: bool,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, key: KeySpec) -> Self {
        Self {
            name: name.into(),
            key,
            indexes: Vec::new(),
            stream_enabled: false,
        }
    }

    /// Add a secondary index.
    pub fn with_index(mut self, name: impl Into<String>, key: KeySpec) -> Self {
        self.indexes.push(IndexSpec {
            name: name.into(),
            key,
        });
        self
    }

    /// Look up a secondary index by name.
    pub fn index(&self, name: &str) -> Option<&IndexSpec> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Read a table provisioning descriptor (the JSON document
    /// `ddbtbl-codegen` emits per table).
    pub fn from_descriptor_json(json: &str) -> Result<Self> {
        let doc: DescriptorDoc = serde_json::from_str(json)
            .map_err(|e| Error::Validation(format!("invalid table descriptor: {}", e)))?;
        doc.into_spec()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescriptorDoc {
    table_name: String,
    attribute_definitions: Vec<DescriptorAttr>,
    key_schema: Vec<DescriptorKey>,
    #[serde(default)]
    global_secondary_indexes: Vec<DescriptorIndex>,
    #[serde(default)]
    stream_specification: Option<DescriptorStream>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescriptorAttr {
    attribute_name: String,
    attribute_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescriptorKey {
    attribute_name: String,
    key_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescriptorIndex {
    index_name: String,
    key_schema: Vec<DescriptorKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescriptorStream {
    stream_enabled: bool,
}

impl DescriptorDoc {
    fn into_spec(self) -> Result<TableSpec> {
        let key = self.key_spec(&self.key_schema)?;
        let mut spec = TableSpec::new(self.table_name.clone(), key);
        for index in &self.global_secondary_indexes {
            let key = self.key_spec(&index.key_schema)?;
            spec = spec.with_index(index.index_name.clone(), key);
        }
        spec.stream_enabled = self
            .stream_specification
            .as_ref()
            .map_or(false, |s| s.stream_enabled);
        Ok(spec)
    }

    fn key_spec(&self, schema: &[DescriptorKey]) -> Result<KeySpec> {
        let mut hash = None;
        let mut range = None;
        for key in schema {
            let attr = self.attr_spec(&key.attribute_name)?;
            match key.key_type.as_str() {
                "HASH" => hash = Some(attr),
                "RANGE" => range = Some(attr),
                other => {
                    return Err(Error::Validation(format!("unknown key type `{}`", other)))
                }
            }
        }
        let hash = hash.ok_or_else(|| Error::Validation("key schema has no HASH key".into()))?;
        Ok(KeySpec { hash, range })
    }

    fn attr_spec(&self, name: &str) -> Result<AttrSpec> {
        let def = self
            .attribute_definitions
            .iter()
            .find(|a| a.attribute_name == name)
            .ok_or_else(|| {
                Error::Validation(format!("attribute `{}` is used in a key but not defined", name))
            })?;
        let scalar_type = ScalarType::parse(&def.attribute_type).ok_or_else(|| {
            Error::Validation(format!("unknown attribute type `{}`", def.attribute_type))
        })?;
        Ok(AttrSpec::new(name, scalar_type))
    }
}
