//! Table definition validation
//!
//! Turns raw definitions into the validated schema model. A definition with
//! any problem is dropped and reported through one [`Diagnostic`]; it never
//! reaches a generator.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::codegen::{index_method_suffix, key_type_name};

use super::metadata::{
    AttrDef, AttrType, IndexDef, NativeType, RawAttrDef, RawIndexDef, RawTableDef,
    SecondaryIndexDef, TableDef,
};

/// Every problem found in one rejected table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The table's declared name, or `tables[i]` when the name is blank
    pub table: String,
    pub problems: Vec<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.table, self.problems.join("; "))
    }
}

/// Result of validating a definition source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Accepted tables, in source order
    pub tables: Vec<TableDef>,
    /// One entry per rejected table, in source order
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate raw table definitions.
pub fn validate(raw: &[RawTableDef]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut accepted_names: HashSet<&str> = HashSet::new();

    for (i, candidate) in raw.iter().enumerate() {
        let mut problems = Vec::new();
        let table = validate_table(candidate, &accepted_names, &mut problems);

        match table {
            Some(table) if problems.is_empty() => {
                accepted_names.insert(candidate.table_name.as_str());
                report.tables.push(table);
            }
            _ => {
                let label = if is_blank(&candidate.table_name) {
                    format!("tables[{}]", i)
                } else {
                    candidate.table_name.clone()
                };
                report.diagnostics.push(Diagnostic {
                    table: label,
                    problems,
                });
            }
        }
    }

    report
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn validate_table(
    raw: &RawTableDef,
    accepted_names: &HashSet<&str>,
    problems: &mut Vec<String>,
) -> Option<TableDef> {
    if is_blank(&raw.table_name) {
        problems.push("table name is blank".to_string());
    } else if accepted_names.contains(raw.table_name.as_str()) {
        problems.push(format!(
            "table name `{}` is already defined by an earlier table",
            raw.table_name
        ));
    }

    let primary_index = validate_index("primaryIndex", &raw.primary_index, problems);

    let mut secondary_indexes = Vec::new();
    let mut index_names: HashSet<String> = HashSet::new();
    let mut generated: HashMap<String, String> = HashMap::new();
    generated.insert(index_method_suffix(None), "primaryIndex".to_string());
    generated.insert(key_type_name(&raw.table_name, None), "primaryIndex".to_string());
    for (j, secondary) in raw.secondary_indexes.to_list().iter().enumerate() {
        let label = format!("secondaryIndexes[{}]", j);
        if is_blank(&secondary.name) {
            problems.push(format!("{}: index name is blank", label));
        } else if !index_names.insert(secondary.name.clone()) {
            problems.push(format!(
                "{}: index name `{}` is declared more than once",
                label, secondary.name
            ));
        } else {
            claim_generated_names(
                &label,
                &raw.table_name,
                &secondary.name,
                &mut generated,
                problems,
            );
        }
        if let Some(index) = validate_index(&label, &secondary.index, problems) {
            secondary_indexes.push(SecondaryIndexDef {
                name: secondary.name.clone(),
                index,
            });
        }
    }

    let table = TableDef {
        name: raw.table_name.clone(),
        primary_index: primary_index?,
        secondary_indexes,
        stream_enabled: raw.stream_enabled,
    };
    check_attribute_types(&table, problems);
    Some(table)
}

/// Indexes of one table share a unit, so the method suffix and key record
/// each index name casts to must be unique within the table.
fn claim_generated_names(
    label: &str,
    table_name: &str,
    index_name: &str,
    generated: &mut HashMap<String, String>,
    problems: &mut Vec<String>,
) {
    let idents = [
        index_method_suffix(Some(index_name)),
        key_type_name(table_name, Some(index_name)),
    ];
    if let Some((ident, owner)) = idents
        .iter()
        .find_map(|ident| generated.get(ident).map(|owner| (ident, owner)))
    {
        problems.push(format!(
            "{}: index name `{}` generates `{}`, already generated by {}",
            label, index_name, ident, owner
        ));
        return;
    }
    for ident in idents {
        generated.insert(ident, label.to_string());
    }
}

fn validate_index(label: &str, raw: &RawIndexDef, problems: &mut Vec<String>) -> Option<IndexDef> {
    if raw.pk.is_empty() {
        problems.push(format!("{}: pk is required", label));
        if !raw.sk.is_empty() {
            validate_attr(label, "sk", &raw.sk, problems);
        }
        return None;
    }

    let pk = validate_attr(label, "pk", &raw.pk, problems);
    let sk = if raw.sk.is_empty() {
        Some(None)
    } else {
        validate_attr(label, "sk", &raw.sk, problems).map(Some)
    };

    if !raw.sk.is_empty() && raw.sk.attr_name == raw.pk.attr_name {
        problems.push(format!(
            "{}: pk and sk both name attribute `{}`",
            label, raw.pk.attr_name
        ));
        return None;
    }

    Some(IndexDef { pk: pk?, sk: sk? })
}

fn validate_attr(
    label: &str,
    key: &str,
    raw: &RawAttrDef,
    problems: &mut Vec<String>,
) -> Option<AttrDef> {
    let mut valid = true;
    if is_blank(&raw.attr_name) {
        problems.push(format!("{}.{}: attribute name is blank", label, key));
        valid = false;
    }
    let attr_type = AttrType::parse(&raw.attr_type);
    if attr_type.is_none() {
        problems.push(format!(
            "{}.{}: unknown attribute type `{}` (expected string, int, int64 or bytes)",
            label, key, raw.attr_type
        ));
        valid = false;
    }

    match attr_type {
        Some(attr_type) if valid => Some(AttrDef::new(&raw.attr_name, attr_type)),
        _ => None,
    }
}

/// An attribute shared by several indexes must keep one native type, or the
/// table cannot be provisioned.
fn check_attribute_types(table: &TableDef, problems: &mut Vec<String>) {
    let mut seen: HashMap<&str, NativeType> = HashMap::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for attr in table.key_attrs() {
        let native = attr.attr_type.native_type();
        match seen.get(attr.name.as_str()) {
            Some(&first) if first != native => {
                if reported.insert(attr.name.as_str()) {
                    problems.push(format!(
                        "attribute `{}` is declared with conflicting types {} and {}",
                        attr.name, first, native
                    ));
                }
            }
            Some(_) => {}
            None => {
                seen.insert(attr.name.as_str(), native);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::metadata::{RawSecondaryIndexDef, RawSecondaryIndexes};

    fn raw_table(name: &str, pk: (&str, &str), sk: (&str, &str)) -> RawTableDef {
        RawTableDef {
            table_name: name.to_string(),
            primary_index: RawIndexDef {
                pk: RawAttrDef::new(pk.0, pk.1),
                sk: RawAttrDef::new(sk.0, sk.1),
            },
            ..Default::default()
        }
    }

    fn with_secondary(mut table: RawTableDef, name: &str, pk: (&str, &str)) -> RawTableDef {
        let mut list = table.secondary_indexes.to_list();
        list.push(RawSecondaryIndexDef {
            name: name.to_string(),
            index: RawIndexDef {
                pk: RawAttrDef::new(pk.0, pk.1),
                sk: RawAttrDef::default(),
            },
        });
        table.secondary_indexes = RawSecondaryIndexes::List(list);
        table
    }

    #[test]
    fn test_valid_table_is_preserved() {
        let raw = with_secondary(
            raw_table("TUser", ("uid", "int"), ("", "")),
            "name-index",
            ("name", "string"),
        );
        let report = validate(&[raw]);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.tables.len(), 1);

        let t = &report.tables[0];
        assert_eq!(t.name, "TUser");
        assert!(t.primary_index.is_simple());
        assert_eq!(t.primary_index.pk, AttrDef::new("uid", AttrType::Int));
        assert_eq!(t.secondary_indexes[0].name, "name-index");
    }

    #[test]
    fn test_composite_primary_index() {
        let report = validate(&[raw_table("T", ("uid", "int"), ("stg_id", "int64"))]);
        let t = &report.tables[0];
        assert!(!t.primary_index.is_simple());
        assert_eq!(
            t.primary_index.sk,
            Some(AttrDef::new("stg_id", AttrType::Int64))
        );
    }

    #[test]
    fn test_blank_name_reported_by_position() {
        let report = validate(&[
            raw_table("Good", ("id", "string"), ("", "")),
            raw_table("  ", ("id", "string"), ("", "")),
        ]);
        assert_eq!(report.tables.len(), 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].table, "tables[1]");
    }

    #[test]
    fn test_missing_primary_pk() {
        let report = validate(&[raw_table("T", ("", ""), ("", ""))]);
        assert!(report.tables.is_empty());
        assert_eq!(report.diagnostics[0].table, "T");
        assert_eq!(report.diagnostics[0].problems, vec!["primaryIndex: pk is required"]);
    }

    #[test]
    fn test_unknown_types_rejected() {
        let report = validate(&[raw_table("T", ("uid", "float"), ("", ""))]);
        assert!(report.tables.is_empty());

        let report = validate(&[raw_table("T", ("uid", "int"), ("stg", "uint"))]);
        assert!(report.tables.is_empty());

        // A sort key with a name but no type is not the empty attribute
        let report = validate(&[raw_table("T", ("uid", "int"), ("stg", ""))]);
        assert!(report.tables.is_empty());
    }

    #[test]
    fn test_one_diagnostic_collects_every_problem() {
        let raw = with_secondary(raw_table("", ("", ""), ("", "")), "", ("", ""));
        let report = validate(&[raw]);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].problems.len(), 4);
    }

    #[test]
    fn test_secondary_index_without_name() {
        let raw = with_secondary(raw_table("T", ("uid", "int"), ("", "")), "", ("name", "string"));
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_duplicate_secondary_index_names() {
        let raw = raw_table("T", ("uid", "int"), ("", ""));
        let raw = with_secondary(raw, "name-index", ("name", "string"));
        let raw = with_secondary(raw, "name-index", ("nick", "string"));
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());
    }

    #[test]
    fn test_index_names_generating_the_same_items() {
        let raw = raw_table("T", ("uid", "int"), ("", ""));
        let raw = with_secondary(raw, "primary-index", ("name", "string"));
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());
        assert_eq!(
            report.diagnostics[0].problems,
            vec![
                "secondaryIndexes[0]: index name `primary-index` generates `primary_index`, \
                 already generated by primaryIndex"
            ]
        );

        let raw = raw_table("T", ("uid", "int"), ("", ""));
        let raw = with_secondary(raw, "x-idx", ("name", "string"));
        let raw = with_secondary(raw, "x_idx", ("nick", "string"));
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(
            report.diagnostics[0].problems,
            vec![
                "secondaryIndexes[1]: index name `x_idx` generates `x_idx`, \
                 already generated by secondaryIndexes[0]"
            ]
        );

        // "Primary" keeps its own methods but would reuse the primary key record
        let raw = raw_table("T", ("uid", "int"), ("", ""));
        let raw = with_secondary(raw, "Primary", ("name", "string"));
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());
        assert!(report.diagnostics[0].problems[0].contains("`TPrimaryKey`"));
    }

    #[test]
    fn test_pk_and_sk_on_same_attribute() {
        let report = validate(&[raw_table("T", ("uid", "int"), ("uid", "int"))]);
        assert!(report.tables.is_empty());
        assert_eq!(
            report.diagnostics[0].problems,
            vec!["primaryIndex: pk and sk both name attribute `uid`"]
        );
    }

    #[test]
    fn test_duplicate_table_names() {
        let report = validate(&[
            raw_table("T", ("uid", "int"), ("", "")),
            raw_table("T", ("id", "string"), ("", "")),
        ]);
        assert_eq!(report.tables.len(), 1);
        assert_eq!(report.tables[0].primary_index.pk.name, "uid");
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_conflicting_attribute_types() {
        let raw = with_secondary(
            raw_table("T", ("uid", "int"), ("", "")),
            "uid-index",
            ("uid", "string"),
        );
        let report = validate(&[raw]);
        assert!(report.tables.is_empty());

        // int and int64 share a native type
        let raw = with_secondary(
            raw_table("T", ("uid", "int"), ("", "")),
            "uid-index",
            ("uid", "int64"),
        );
        assert_eq!(validate(&[raw]).tables.len(), 1);
    }
}
