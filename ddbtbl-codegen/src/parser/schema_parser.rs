//! Table definition source decoding (YAML, JSON or TOML)

use std::path::Path;

use serde::Deserialize;

use super::metadata::RawTableDef;
use crate::error::{CodegenError, Result};

/// Formats a definition source may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// A top-level sequence of table records, as in `tbldef.yaml`
    Yaml,
    /// A top-level array of table records
    Json,
    /// An array of tables under the `tables` key (`[[tables]]`)
    Toml,
}

impl DefinitionFormat {
    /// Pick the format from a file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(DefinitionFormat::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(DefinitionFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(DefinitionFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlDefinitions {
    #[serde(default)]
    tables: Vec<RawTableDef>,
}

/// Parse a definition source string into raw table definitions
pub fn parse_definitions(source: &str, format: DefinitionFormat) -> Result<Vec<RawTableDef>> {
    match format {
        DefinitionFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| CodegenError::ParseError(format!("invalid YAML definitions: {}", e))),
        DefinitionFormat::Json => serde_json::from_str(source)
            .map_err(|e| CodegenError::ParseError(format!("invalid JSON definitions: {}", e))),
        DefinitionFormat::Toml => toml::from_str::<TomlDefinitions>(source)
            .map(|doc| doc.tables)
            .map_err(|e| CodegenError::ParseError(format!("invalid TOML definitions: {}", e))),
    }
}

/// Read and parse a definition file.
///
/// Files without a `.yaml`, `.yml`, `.json` or `.toml` extension are tried as
/// JSON, then TOML, then YAML.
pub fn load_definitions(path: &Path) -> Result<Vec<RawTableDef>> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        CodegenError::LoadError(format!("cannot read {}: {}", path.display(), e))
    })?;

    match DefinitionFormat::from_path(path) {
        Some(format) => parse_definitions(&source, format),
        None => parse_definitions(&source, DefinitionFormat::Json)
            .or_else(|_| parse_definitions(&source, DefinitionFormat::Toml))
            .or_else(|_| parse_definitions(&source, DefinitionFormat::Yaml)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::metadata::{RawAttrDef, RawSecondaryIndexes};

    #[test]
    fn test_parse_json_list_indexes() {
        let json = r#"[
            {
                "tableName": "TUserStageRanking",
                "primaryIndex": {
                    "pk": {"attrName": "uid", "attrType": "int"},
                    "sk": {"attrName": "stg_id", "attrType": "int64"}
                },
                "secondaryIndexes": [
                    {
                        "name": "pkey-index",
                        "pk": {"attrName": "pkey", "attrType": "string"},
                        "sk": {"attrName": "score", "attrType": "int"}
                    }
                ],
                "streamEnabled": true
            }
        ]"#;
        let tables = parse_definitions(json, DefinitionFormat::Json).unwrap();
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.table_name, "TUserStageRanking");
        assert_eq!(t.primary_index.sk, RawAttrDef::new("stg_id", "int64"));
        assert!(t.stream_enabled);

        let indexes = t.secondary_indexes.to_list();
        assert_eq!(indexes[0].name, "pkey-index");
        assert_eq!(indexes[0].index.pk, RawAttrDef::new("pkey", "string"));
    }

    #[test]
    fn test_parse_json_map_indexes() {
        let json = r#"[
            {
                "tableName": "TUser",
                "primaryIndex": {"pk": {"attrName": "uid", "attrType": "int"}},
                "secondaryIndexes": {
                    "name-index": {"pk": {"attrName": "name", "attrType": "string"}}
                }
            }
        ]"#;
        let tables = parse_definitions(json, DefinitionFormat::Json).unwrap();
        let t = &tables[0];
        assert!(t.primary_index.sk.is_empty());
        assert!(!t.stream_enabled);
        assert!(matches!(t.secondary_indexes, RawSecondaryIndexes::Map(_)));
        let indexes = t.secondary_indexes.to_list();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].name, "name-index");
        assert!(indexes[0].index.sk.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let source = r#"
            [[tables]]
            tableName = "TUser"
            primaryIndex = { pk = { attrName = "uid", attrType = "int" } }

            [[tables.secondaryIndexes]]
            name = "name-index"
            pk = { attrName = "name", attrType = "string" }
        "#;
        let tables = parse_definitions(source, DefinitionFormat::Toml).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].secondary_indexes.to_list()[0].name, "name-index");
    }

    #[test]
    fn test_parse_yaml_both_index_shapes() {
        let source = r#"
- tableName: TUser
  primaryIndex:
    pk:
      attrName: uid
      attrType: int
  secondaryIndexes:
    name-index:
      pk:
        attrName: name
        attrType: string
- tableName: TUserStageRanking
  primaryIndex:
    pk:
      attrName: uid
      attrType: int
    sk:
      attrName: stg_id
      attrType: int64
  secondaryIndexes:
    - name: pkey-index
      pk:
        attrName: pkey
        attrType: string
      sk:
        attrName: score
        attrType: int
  streamEnabled: true
"#;
        let tables = parse_definitions(source, DefinitionFormat::Yaml).unwrap();
        assert_eq!(tables.len(), 2);

        assert!(matches!(tables[0].secondary_indexes, RawSecondaryIndexes::Map(_)));
        assert_eq!(tables[0].secondary_indexes.to_list()[0].name, "name-index");
        assert!(!tables[0].stream_enabled);

        let ranking = &tables[1];
        assert!(matches!(ranking.secondary_indexes, RawSecondaryIndexes::List(_)));
        assert_eq!(ranking.primary_index.sk, RawAttrDef::new("stg_id", "int64"));
        let indexes = ranking.secondary_indexes.to_list();
        assert_eq!(indexes[0].name, "pkey-index");
        assert_eq!(indexes[0].index.sk, RawAttrDef::new("score", "int"));
        assert!(ranking.stream_enabled);
    }

    #[test]
    fn test_load_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["tbldef.yaml", "tbldef.yml", "tbldef.def"] {
            let path = dir.path().join(file);
            std::fs::write(
                &path,
                "- tableName: T\n  primaryIndex:\n    pk: {attrName: id, attrType: string}\n",
            )
            .unwrap();
            let tables = load_definitions(&path).unwrap();
            assert_eq!(tables[0].table_name, "T");
            assert_eq!(tables[0].primary_index.pk, RawAttrDef::new("id", "string"));
        }
        assert_eq!(
            DefinitionFormat::from_path(Path::new("tbldef.YML")),
            Some(DefinitionFormat::Yaml)
        );
    }

    #[test]
    fn test_missing_fields_default_to_blank() {
        let tables = parse_definitions(r#"[{}]"#, DefinitionFormat::Json).unwrap();
        assert_eq!(tables[0].table_name, "");
        assert!(tables[0].primary_index.pk.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_definitions("{not json", DefinitionFormat::Json).unwrap_err();
        assert!(matches!(err, CodegenError::ParseError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_definitions(Path::new("/nonexistent/tables.json")).unwrap_err();
        assert!(matches!(err, CodegenError::LoadError(_)));
    }

    #[test]
    fn test_load_unknown_extension_falls_back_to_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.def");
        std::fs::write(
            &path,
            "[[tables]]\ntableName = \"T\"\nprimaryIndex = { pk = { attrName = \"id\", attrType = \"string\" } }\n",
        )
        .unwrap();
        let tables = load_definitions(&path).unwrap();
        assert_eq!(tables[0].table_name, "T");
    }
}
