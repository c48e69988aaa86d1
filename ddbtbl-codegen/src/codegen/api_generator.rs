//! API generator - emits the typed accessor API of each table

use tracing::debug;

use super::gen_def::{IndexGenDef, TableGenDef};
use super::support_generator::SUPPORT_MODULE;

/// Generate the unformatted source of one table's accessor API unit.
pub fn generate_table_api(table: &TableGenDef) -> String {
    debug!(
        "Generating API for {} -> {}",
        table.names.raw,
        table.file_name()
    );

    let mut code = String::new();
    code.push_str(&generate_imports(table));
    code.push('\n');

    // Key records of composite indexes
    for index in std::iter::once(&table.primary).chain(&table.secondaries) {
        if index.sk.is_some() {
            code.push_str(&generate_key_record(index));
        }
    }

    code.push_str(&generate_api_struct(table));
    code.push_str(&format!("impl {} {{\n", table.api_type));
    code.push_str(&generate_table_methods(table));
    code.push_str(&generate_index_methods(&table.primary));
    for index in &table.secondaries {
        code.push_str(&generate_index_methods(index));
    }
    code.push_str("}\n\n");
    code.push_str(&generate_entry_function(table));

    code
}

/// Generate the unformatted source of the `mod.rs` that ties the units together.
pub fn generate_api_mod(tables: &[TableGenDef]) -> String {
    let mut code = String::new();
    // Consumers that only touch table items leave the support re-export unused
    code.push_str(&format!(
        "pub mod {module};\n#[allow(unused_imports)]\npub use {module}::*;\n",
        module = SUPPORT_MODULE
    ));
    for table in tables {
        code.push_str(&format!(
            "pub mod {module};\npub use {module}::*;\n",
            module = table.module
        ));
    }
    code
}

fn generate_imports(table: &TableGenDef) -> String {
    let indexes = || std::iter::once(&table.primary).chain(&table.secondaries);
    let any_composite = indexes().any(|index| index.sk.is_some());

    let mut runtime = vec!["BatchWrite", "Db", "Key"];
    if any_composite {
        runtime.push("KeyAttr");
    }
    runtime.extend(["Put", "Scan", "Table", "ToItem"]);

    let mut support = vec!["unique_keys", "BatchWithPrimaryIndex"];
    if !table.secondaries.is_empty() {
        support.push("BatchWithSecondaryIndex");
    }
    if table.primary.sk.is_some() {
        support.push("QueryWithPrimaryIndex");
    }
    if table.secondaries.iter().any(|index| index.sk.is_some()) {
        support.push("QueryWithSecondaryIndex");
    }
    support.push("WithPrimaryIndex");
    if !table.secondaries.is_empty() {
        support.push("WithSecondaryIndex");
    }

    format!(
        "use ddbtbl::{{{}}};\n\nuse super::{}::{{{}}};\n",
        runtime.join(", "),
        SUPPORT_MODULE,
        support.join(", ")
    )
}

fn generate_key_record(index: &IndexGenDef) -> String {
    let Some(sk) = &index.sk else {
        return String::new();
    };
    let doc = match &index.names {
        None => "primary index".to_string(),
        Some(names) => format!("`{}` index", names.raw),
    };
    format!(
        r#"/// Key of one item of the {doc}.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct {key_type} {{
    pub {pk_ident}: {pk_type},
    pub {sk_ident}: {sk_type},
}}

"#,
        key_type = index.key_type,
        pk_ident = index.pk.ident,
        pk_type = index.pk.rust_type.to_type_string(),
        sk_ident = sk.ident,
        sk_type = sk.rust_type.to_type_string(),
    )
}

fn generate_api_struct(table: &TableGenDef) -> String {
    format!(
        r#"/// Typed accessors for the `{raw}` table.
#[derive(Debug, Clone)]
pub struct {api_type} {{
    table: Table,
}}

"#,
        raw = table.names.raw,
        api_type = table.api_type,
    )
}

fn generate_table_methods(table: &TableGenDef) -> String {
    format!(
        r#"    /// Table name as stored.
    pub const TABLE_NAME: &'static str = {quoted};

    pub fn new(db: &Db) -> Self {{
        Self {{
            table: db.table(Self::TABLE_NAME),
        }}
    }}

    /// The underlying table handle.
    pub fn table(&self) -> &Table {{
        &self.table
    }}

    /// Scan every item of the table.
    pub fn scan(&self) -> Scan {{
        self.table.scan()
    }}

    /// Write an item, replacing any item with the same key.
    pub fn put<T: ToItem + ?Sized>(&self, item: &T) -> Put {{
        self.table.put(item)
    }}

    /// Write several items, chunked to the store's batch limit.
    pub fn batch_put<T: ToItem>(&self, items: &[T]) -> BatchWrite {{
        self.table.batch_write().put(items)
    }}

"#,
        quoted = table.names.quoted,
    )
}

/// Key constructor expression over the given value expressions.
fn key_expr(index: &IndexGenDef, pk_value: &str, sk_value: &str) -> String {
    match &index.sk {
        None => format!("Key::hash({}, {})", index.pk.names.quoted, pk_value),
        Some(sk) => format!(
            "Key::composite({}, {}, {}, {})",
            index.pk.names.quoted, pk_value, sk.names.quoted, sk_value
        ),
    }
}

fn generate_index_methods(index: &IndexGenDef) -> String {
    let mut code = String::new();
    code.push_str(&generate_with_method(index));
    if index.sk.is_some() {
        code.push_str(&generate_query_with_method(index));
    }
    code.push_str(&generate_batch_with_method(index));
    code
}

/// The accessor type name for the given kind ("With", "QueryWith", "BatchWith").
fn accessor_type(index: &IndexGenDef, kind: &str) -> String {
    if index.is_primary() {
        format!("{}PrimaryIndex", kind)
    } else {
        format!("{}SecondaryIndex", kind)
    }
}

/// Constructor arguments placed between the table and the key.
fn index_arg(index: &IndexGenDef) -> String {
    match &index.names {
        None => String::new(),
        Some(names) => format!("{}, ", names.quoted),
    }
}

fn index_doc(index: &IndexGenDef) -> String {
    match &index.names {
        None => "the primary index".to_string(),
        Some(names) => format!("the `{}` index", names.raw),
    }
}

fn generate_with_method(index: &IndexGenDef) -> String {
    let mut params = vec![index.pk.param()];
    if let Some(sk) = &index.sk {
        params.push(sk.param());
    }
    let sk_ident = index.sk.as_ref().map(|sk| sk.ident.as_str()).unwrap_or("");
    let accessor = accessor_type(index, "With");
    format!(
        r#"    /// Address one key of {doc}.
    pub fn with_{suffix}(&self, {params}) -> {accessor} {{
        {accessor}::new(self.table.clone(), {index_arg}{key})
    }}

"#,
        doc = index_doc(index),
        suffix = index.method_suffix,
        params = params.join(", "),
        index_arg = index_arg(index),
        key = key_expr(index, &index.pk.ident, sk_ident),
    )
}

fn generate_query_with_method(index: &IndexGenDef) -> String {
    let Some(sk) = &index.sk else {
        return String::new();
    };
    let accessor = accessor_type(index, "QueryWith");
    format!(
        r#"    /// Range over one hash key of {doc}.
    pub fn query_with_{suffix}(&self, {param}) -> {accessor} {{
        {accessor}::new(
            self.table.clone(),
            {index_arg}KeyAttr::new({pk_quoted}, {pk_ident}),
            {sk_quoted},
        )
    }}

"#,
        doc = index_doc(index),
        suffix = index.method_suffix,
        param = index.pk.param(),
        index_arg = index_arg(index),
        pk_quoted = index.pk.names.quoted,
        pk_ident = index.pk.ident,
        sk_quoted = sk.names.quoted,
    )
}

fn generate_batch_with_method(index: &IndexGenDef) -> String {
    let (param, key) = match &index.sk {
        None => (
            format!(
                "{}: &[{}]",
                index.batch_param(),
                index.pk.rust_type.to_param_type_string()
            ),
            format!(
                "{}.iter().map(|v| {})",
                index.batch_param(),
                key_expr(index, "v", "")
            ),
        ),
        Some(sk) => (
            format!("keys: &[{}]", index.key_type),
            format!(
                "keys.iter().map(|k| {})",
                key_expr(
                    index,
                    &format!("&k.{}", index.pk.ident),
                    &format!("&k.{}", sk.ident)
                )
            ),
        ),
    };
    let accessor = accessor_type(index, "BatchWith");
    format!(
        r#"    /// Address several keys of {doc}. Repeated keys are dropped.
    pub fn batch_with_{suffix}(&self, {param}) -> {accessor} {{
        {accessor}::new(self.table.clone(), {index_arg}unique_keys({key}))
    }}

"#,
        doc = index_doc(index),
        suffix = index.method_suffix,
        index_arg = index_arg(index),
    )
}

fn generate_entry_function(table: &TableGenDef) -> String {
    format!(
        r#"/// Accessors for the `{raw}` table of `db`.
pub fn {module}(db: &Db) -> {api_type} {{
    {api_type}::new(db)
}}
"#,
        raw = table.names.raw,
        module = table.module,
        api_type = table.api_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AttrDef, AttrType, IndexDef, SecondaryIndexDef, TableDef};

    fn t_user() -> TableGenDef {
        TableGenDef::new(&TableDef {
            name: "TUser".into(),
            primary_index: IndexDef::simple(AttrDef::new("uid", AttrType::Int)),
            secondary_indexes: vec![SecondaryIndexDef {
                name: "name-index".into(),
                index: IndexDef::simple(AttrDef::new("name", AttrType::String)),
            }],
            stream_enabled: false,
        })
    }

    fn t_user_stage_ranking() -> TableGenDef {
        TableGenDef::new(&TableDef {
            name: "TUserStageRanking".into(),
            primary_index: IndexDef::composite(
                AttrDef::new("uid", AttrType::Int),
                AttrDef::new("stg_id", AttrType::Int64),
            ),
            secondary_indexes: vec![SecondaryIndexDef {
                name: "pkey-index".into(),
                index: IndexDef::composite(
                    AttrDef::new("pkey", AttrType::String),
                    AttrDef::new("score", AttrType::Int),
                ),
            }],
            stream_enabled: true,
        })
    }

    #[test]
    fn test_simple_table_api() {
        let code = generate_table_api(&t_user());
        syn::parse_file(&code).unwrap();

        assert!(code.contains("pub struct TUserApi"));
        assert!(code.contains("pub const TABLE_NAME: &'static str = \"TUser\";"));
        assert!(code.contains("pub fn t_user(db: &Db) -> TUserApi"));
        assert!(code.contains("pub fn with_primary_index(&self, uid: i32) -> WithPrimaryIndex"));
        assert!(code.contains("Key::hash(\"uid\", uid)"));
        assert!(code.contains("pub fn batch_with_primary_index(&self, uids: &[i32])"));
        assert!(code.contains("pub fn with_name_index(&self, name: &str) -> WithSecondaryIndex"));
        assert!(code.contains("WithSecondaryIndex::new(self.table.clone(), \"name-index\", "));
        assert!(code.contains("pub fn batch_with_name_index(&self, names: &[&str])"));

        // No range accessors or key records without a sort key
        assert!(!code.contains("query_with_"));
        assert!(!code.contains("PrimaryKey"));
        assert!(!code.contains("KeyAttr"));
    }

    #[test]
    fn test_composite_table_api() {
        let code = generate_table_api(&t_user_stage_ranking());
        syn::parse_file(&code).unwrap();

        assert!(code.contains("pub struct TUserStageRankingPrimaryKey"));
        assert!(code.contains("pub uid: i32,"));
        assert!(code.contains("pub stg_id: i64,"));
        assert!(code.contains("pub struct TUserStageRankingPkeyIndexKey"));
        assert!(code.contains(
            "pub fn with_primary_index(&self, uid: i32, stg_id: i64) -> WithPrimaryIndex"
        ));
        assert!(code.contains("Key::composite(\"uid\", uid, \"stg_id\", stg_id)"));
        assert!(code.contains(
            "pub fn query_with_primary_index(&self, uid: i32) -> QueryWithPrimaryIndex"
        ));
        assert!(code.contains(
            "pub fn batch_with_primary_index(&self, keys: &[TUserStageRankingPrimaryKey])"
        ));
        assert!(code.contains("Key::composite(\"uid\", &k.uid, \"stg_id\", &k.stg_id)"));
        assert!(code.contains(
            "pub fn query_with_pkey_index(&self, pkey: &str) -> QueryWithSecondaryIndex"
        ));
        assert!(code.contains(
            "pub fn batch_with_pkey_index(&self, keys: &[TUserStageRankingPkeyIndexKey])"
        ));
    }

    #[test]
    fn test_secondary_index_is_read_only() {
        let code = generate_table_api(&t_user());
        let file = syn::parse_file(&code).unwrap();
        let methods: Vec<String> = file
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Impl(imp) => Some(imp),
                _ => None,
            })
            .flat_map(|imp| imp.items.iter())
            .filter_map(|item| match item {
                syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            methods,
            vec![
                "new",
                "table",
                "scan",
                "put",
                "batch_put",
                "with_primary_index",
                "batch_with_primary_index",
                "with_name_index",
                "batch_with_name_index",
            ]
        );
    }

    #[test]
    fn test_keyword_names_are_escaped() {
        let def = TableGenDef::new(&TableDef {
            name: "Type".into(),
            primary_index: IndexDef::composite(
                AttrDef::new("type", AttrType::String),
                AttrDef::new("match", AttrType::Bytes),
            ),
            secondary_indexes: vec![],
            stream_enabled: false,
        });
        let code = generate_table_api(&def);
        syn::parse_file(&code).unwrap();
        assert!(code.contains("pub fn r#type(db: &Db) -> TypeApi"));
        assert!(code.contains("pub r#match: Vec<u8>,"));
        assert!(code.contains("Key::composite(\"type\", r#type, \"match\", r#match)"));
    }

    #[test]
    fn test_api_mod() {
        let code = generate_api_mod(&[t_user(), t_user_stage_ranking()]);
        syn::parse_file(&code).unwrap();
        assert_eq!(
            code,
            "pub mod support;\n#[allow(unused_imports)]\npub use support::*;\n\
             pub mod t_user;\npub use t_user::*;\n\
             pub mod t_user_stage_ranking;\npub use t_user_stage_ranking::*;\n"
        );
    }
}
