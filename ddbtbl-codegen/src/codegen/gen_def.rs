//! Presentation projections of validated tables for code emission

use crate::parser::{AttrDef, IndexDef, TableDef};

use super::naming::{
    api_type_name, batch_param_name, derive_names, escape_field_name, index_method_suffix,
    key_type_name, module_name, NameForms,
};
use super::type_resolver::{RustType, TypeResolver};

/// A key attribute ready for emission.
#[derive(Debug, Clone)]
pub struct AttrGenDef {
    pub names: NameForms,
    /// Parameter / field identifier, keyword-escaped
    pub ident: String,
    pub rust_type: RustType,
}

impl AttrGenDef {
    fn new(attr: &AttrDef) -> Self {
        Self {
            names: derive_names(&attr.name),
            ident: escape_field_name(&attr.name),
            rust_type: TypeResolver::resolve(attr.attr_type),
        }
    }

    /// `ident: param_type`
    pub fn param(&self) -> String {
        format!("{}: {}", self.ident, self.rust_type.to_param_type_string())
    }
}

/// An index ready for emission. `names` is `None` for the primary index.
#[derive(Debug, Clone)]
pub struct IndexGenDef {
    pub names: Option<NameForms>,
    /// e.g. `primary_index`, `name_index`
    pub method_suffix: String,
    /// Record type of a composite key
    pub key_type: String,
    pub pk: AttrGenDef,
    pub sk: Option<AttrGenDef>,
}

impl IndexGenDef {
    fn new(table_name: &str, index_name: Option<&str>, index: &IndexDef) -> Self {
        Self {
            names: index_name.map(derive_names),
            method_suffix: index_method_suffix(index_name),
            key_type: key_type_name(table_name, index_name),
            pk: AttrGenDef::new(&index.pk),
            sk: index.sk.as_ref().map(AttrGenDef::new),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.names.is_none()
    }

    /// Parameter name of the hash key value list of a simple index
    pub fn batch_param(&self) -> String {
        batch_param_name(&self.pk.names.raw)
    }
}

/// A table ready for emission.
#[derive(Debug, Clone)]
pub struct TableGenDef {
    pub names: NameForms,
    /// Accessor API type, e.g. `TUserApi`
    pub api_type: String,
    /// Module and entry function identifier, e.g. `t_user`
    pub module: String,
    pub primary: IndexGenDef,
    pub secondaries: Vec<IndexGenDef>,
}

impl TableGenDef {
    pub fn new(table: &TableDef) -> Self {
        Self {
            names: derive_names(&table.name),
            api_type: api_type_name(&table.name),
            module: module_name(&table.name),
            primary: IndexGenDef::new(&table.name, None, &table.primary_index),
            secondaries: table
                .secondary_indexes
                .iter()
                .map(|s| IndexGenDef::new(&table.name, Some(&s.name), &s.index))
                .collect(),
        }
    }

    /// Output file name of the table's API unit
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.names.snake)
    }
}
