//! Descriptor generator - lowers a table definition into its provisioning descriptor

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{CodegenError, Result};
use crate::parser::{IndexDef, NativeType, TableDef};

/// Billing mode of every provisioned table
pub const BILLING_MODE: &str = "PAY_PER_REQUEST";

/// Projection of every secondary index
pub const PROJECTION_ALL: &str = "ALL";

/// Stream view type of a table with streams enabled
pub const STREAM_VIEW_TYPE: &str = "NEW_AND_OLD_IMAGES";

/// A table provisioning request, in the shape the store's create-table call takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningDescriptor {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    pub billing_mode: String,
    pub stream_specification: StreamSpecification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: NativeType,
}

/// Role of an attribute in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    Hash,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    pub projection_type: String,
}

/// A disabled stream carries no view type at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<String>,
}

/// Build the provisioning descriptor of a validated table.
pub fn build_descriptor(table: &TableDef) -> ProvisioningDescriptor {
    ProvisioningDescriptor {
        table_name: table.name.clone(),
        attribute_definitions: attribute_definitions(table),
        key_schema: key_schema(&table.primary_index),
        global_secondary_indexes: table
            .secondary_indexes
            .iter()
            .map(|secondary| GlobalSecondaryIndex {
                index_name: secondary.name.clone(),
                key_schema: key_schema(&secondary.index),
                projection: Projection {
                    projection_type: PROJECTION_ALL.to_string(),
                },
            })
            .collect(),
        billing_mode: BILLING_MODE.to_string(),
        stream_specification: StreamSpecification {
            stream_enabled: table.stream_enabled,
            stream_view_type: table
                .stream_enabled
                .then(|| STREAM_VIEW_TYPE.to_string()),
        },
    }
}

/// Render a descriptor as pretty JSON.
pub fn render_descriptor(descriptor: &ProvisioningDescriptor) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(descriptor).map_err(|e| CodegenError::RenderError {
            table: descriptor.table_name.clone(),
            message: e.to_string(),
        })?;
    json.push('\n');
    Ok(json)
}

/// Key attributes in first-appearance order, each `(name, native type)` once.
fn attribute_definitions(table: &TableDef) -> Vec<AttributeDefinition> {
    let mut seen = HashSet::new();
    table
        .key_attrs()
        .filter(|attr| seen.insert((attr.name.as_str(), attr.attr_type.native_type())))
        .map(|attr| AttributeDefinition {
            attribute_name: attr.name.clone(),
            attribute_type: attr.attr_type.native_type(),
        })
        .collect()
}

/// Hash element first, then the range element when the index has one.
fn key_schema(index: &IndexDef) -> Vec<KeySchemaElement> {
    let mut schema = vec![KeySchemaElement {
        attribute_name: index.pk.name.clone(),
        key_type: KeyType::Hash,
    }];
    if let Some(sk) = &index.sk {
        schema.push(KeySchemaElement {
            attribute_name: sk.name.clone(),
            key_type: KeyType::Range,
        });
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AttrDef, AttrType, SecondaryIndexDef};

    fn t_user() -> TableDef {
        TableDef {
            name: "TUser".into(),
            primary_index: IndexDef::simple(AttrDef::new("uid", AttrType::Int)),
            secondary_indexes: vec![SecondaryIndexDef {
                name: "name-index".into(),
                index: IndexDef::simple(AttrDef::new("name", AttrType::String)),
            }],
            stream_enabled: false,
        }
    }

    #[test]
    fn test_simple_table_descriptor() {
        let descriptor = build_descriptor(&t_user());
        let json: serde_json::Value =
            serde_json::from_str(&render_descriptor(&descriptor).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "TableName": "TUser",
                "AttributeDefinitions": [
                    {"AttributeName": "uid", "AttributeType": "N"},
                    {"AttributeName": "name", "AttributeType": "S"}
                ],
                "KeySchema": [{"AttributeName": "uid", "KeyType": "HASH"}],
                "GlobalSecondaryIndexes": [{
                    "IndexName": "name-index",
                    "KeySchema": [{"AttributeName": "name", "KeyType": "HASH"}],
                    "Projection": {"ProjectionType": "ALL"}
                }],
                "BillingMode": "PAY_PER_REQUEST",
                "StreamSpecification": {"StreamEnabled": false}
            })
        );
    }

    #[test]
    fn test_shared_attribute_listed_once() {
        let table = TableDef {
            name: "TUserStageRanking".into(),
            primary_index: IndexDef::composite(
                AttrDef::new("uid", AttrType::Int),
                AttrDef::new("stg_id", AttrType::Int64),
            ),
            secondary_indexes: vec![SecondaryIndexDef {
                name: "pkey-index".into(),
                index: IndexDef::composite(
                    AttrDef::new("pkey", AttrType::String),
                    AttrDef::new("uid", AttrType::Int),
                ),
            }],
            stream_enabled: true,
        };
        let descriptor = build_descriptor(&table);

        let names: Vec<&str> = descriptor
            .attribute_definitions
            .iter()
            .map(|a| a.attribute_name.as_str())
            .collect();
        assert_eq!(names, vec!["uid", "stg_id", "pkey"]);

        assert_eq!(
            descriptor.key_schema,
            vec![
                KeySchemaElement {
                    attribute_name: "uid".into(),
                    key_type: KeyType::Hash,
                },
                KeySchemaElement {
                    attribute_name: "stg_id".into(),
                    key_type: KeyType::Range,
                },
            ]
        );
        assert_eq!(
            descriptor.global_secondary_indexes[0].key_schema[1].key_type,
            KeyType::Range
        );
    }

    #[test]
    fn test_stream_specification() {
        let mut table = t_user();
        table.stream_enabled = true;
        let json = render_descriptor(&build_descriptor(&table)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["StreamSpecification"],
            serde_json::json!({"StreamEnabled": true, "StreamViewType": "NEW_AND_OLD_IMAGES"})
        );

        table.stream_enabled = false;
        let json = render_descriptor(&build_descriptor(&table)).unwrap();
        assert!(!json.contains("StreamViewType"));
    }

    #[test]
    fn test_no_secondary_indexes_omits_field() {
        let mut table = t_user();
        table.secondary_indexes.clear();
        let json = render_descriptor(&build_descriptor(&table)).unwrap();
        assert!(!json.contains("GlobalSecondaryIndexes"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_descriptor_is_deterministic() {
        let first = render_descriptor(&build_descriptor(&t_user())).unwrap();
        let second = render_descriptor(&build_descriptor(&t_user())).unwrap();
        assert_eq!(first, second);
    }
}
