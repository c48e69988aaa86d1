//! Naming utilities for code generation

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// The identifier forms derived from one raw schema name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameForms {
    /// The name exactly as declared
    pub raw: String,
    /// e.g. `tUserStageRanking`
    pub lower_camel: String,
    /// e.g. `TUserStageRanking`
    pub upper_camel: String,
    /// e.g. `t_user_stage_ranking`
    pub snake: String,
    /// The raw name as a Rust string literal, e.g. `"TUserStageRanking"`
    pub quoted: String,
}

/// Derive every naming form of `raw`.
///
/// Casing only: identifier-illegal characters are not sanitized.
pub fn derive_names(raw: &str) -> NameForms {
    NameForms {
        raw: raw.to_string(),
        lower_camel: raw.to_lower_camel_case(),
        upper_camel: raw.to_upper_camel_case(),
        snake: raw.to_snake_case(),
        quoted: format!("{:?}", raw),
    }
}

/// Accessor API type of a table, e.g. "TUser" -> "TUserApi"
pub fn api_type_name(table_name: &str) -> String {
    format!("{}Api", table_name.to_upper_camel_case())
}

/// Module / entry function / file stem of a table, e.g. "TUser" -> "t_user"
pub fn module_name(table_name: &str) -> String {
    escape_field_name(table_name)
}

/// Key record type of a composite index.
/// e.g. ("TUserStageRanking", None) -> "TUserStageRankingPrimaryKey",
/// ("TUserStageRanking", Some("pkey-index")) -> "TUserStageRankingPkeyIndexKey"
pub fn key_type_name(table_name: &str, index_name: Option<&str>) -> String {
    match index_name {
        None => format!("{}PrimaryKey", table_name.to_upper_camel_case()),
        Some(index) => format!(
            "{}{}Key",
            table_name.to_upper_camel_case(),
            index.to_upper_camel_case()
        ),
    }
}

/// Suffix of the accessor methods of an index, e.g. None -> "primary_index",
/// Some("name-index") -> "name_index"
pub fn index_method_suffix(index_name: Option<&str>) -> String {
    match index_name {
        None => "primary_index".to_string(),
        Some(index) => index.to_snake_case(),
    }
}

/// Parameter name of a list of hash key values, e.g. "uid" -> "uids".
/// If singular equals plural (e.g., "published"), adds "_list" suffix
pub fn batch_param_name(attr_name: &str) -> String {
    let snake = attr_name.to_snake_case();
    let plural = pluralize(&snake);
    let name = if plural == snake {
        format!("{}_list", snake)
    } else {
        plural
    };
    escape_field_name(&name)
}

/// Pluralize a word using English grammar rules
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }

    // Irregular plurals
    let irregulars: &[(&str, &str)] = &[
        ("person", "people"),
        ("child", "children"),
        ("man", "men"),
        ("woman", "women"),
        ("foot", "feet"),
        ("tooth", "teeth"),
        ("mouse", "mice"),
        ("index", "indices"),
    ];

    for (singular, plural) in irregulars {
        if word == *singular {
            return plural.to_string();
        }
    }

    // Words ending in -is → -es (analysis → analyses, basis → bases)
    if word.ends_with("is") && word.len() > 2 {
        return format!("{}es", &word[..word.len() - 2]);
    }

    // Words ending in -f or -fe → -ves (leaf → leaves, knife → knives)
    if let Some(stripped) = word.strip_suffix("fe") {
        return format!("{}ves", stripped);
    }
    let f_to_ves: &[&str] = &[
        "leaf", "knife", "wife", "life", "shelf", "self", "half", "calf", "loaf", "thief",
    ];
    for &fword in f_to_ves {
        if word == fword {
            return format!("{}ves", &word[..word.len() - 1]);
        }
    }

    // Words ending in -o: some take -es
    let o_to_oes: &[&str] = &["hero", "potato", "tomato", "echo", "veto"];
    for &oword in o_to_oes {
        if word == oword {
            return format!("{}es", word);
        }
    }

    // Past participles used as adjectives stay as they are
    if word.ends_with("ed") && word.len() > 2 {
        return word.to_string();
    }

    // Standard rules: -s, -x, -z, -ch, -sh → add -es
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    // Words ending in consonant + y → -ies
    if word.ends_with('y') && word.len() > 1 {
        let before_y = word.chars().nth(word.len() - 2).unwrap_or('_');
        if !"aeiou".contains(before_y) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{}s", word)
}

/// Check if a name is a Rust reserved keyword
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "try"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
    )
}

/// Snake-case a name and escape it if it's a Rust keyword
pub fn escape_field_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if is_rust_keyword(&snake) {
        format!("r#{}", snake)
    } else {
        snake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_names() {
        let names = derive_names("TUserStageRanking");
        assert_eq!(names.raw, "TUserStageRanking");
        assert_eq!(names.lower_camel, "tUserStageRanking");
        assert_eq!(names.upper_camel, "TUserStageRanking");
        assert_eq!(names.snake, "t_user_stage_ranking");
        assert_eq!(names.quoted, "\"TUserStageRanking\"");

        let names = derive_names("name-index");
        assert_eq!(names.lower_camel, "nameIndex");
        assert_eq!(names.upper_camel, "NameIndex");
        assert_eq!(names.snake, "name_index");
        assert_eq!(names.quoted, "\"name-index\"");

        let names = derive_names("stg_id");
        assert_eq!(names.lower_camel, "stgId");
        assert_eq!(names.upper_camel, "StgId");
    }

    #[test]
    fn test_derive_names_is_deterministic() {
        assert_eq!(derive_names("pkey-index"), derive_names("pkey-index"));
    }

    #[test]
    fn test_type_and_module_names() {
        assert_eq!(api_type_name("TUser"), "TUserApi");
        assert_eq!(module_name("TUser"), "t_user");
        assert_eq!(module_name("Type"), "r#type");
        assert_eq!(
            key_type_name("TUserStageRanking", None),
            "TUserStageRankingPrimaryKey"
        );
        assert_eq!(
            key_type_name("TUserStageRanking", Some("pkey-index")),
            "TUserStageRankingPkeyIndexKey"
        );
    }

    #[test]
    fn test_index_method_suffix() {
        assert_eq!(index_method_suffix(None), "primary_index");
        assert_eq!(index_method_suffix(Some("name-index")), "name_index");
    }

    #[test]
    fn test_batch_param_name() {
        assert_eq!(batch_param_name("uid"), "uids");
        assert_eq!(batch_param_name("name"), "names");
        assert_eq!(batch_param_name("userId"), "user_ids");
        assert_eq!(batch_param_name("published"), "published_list");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("id"), "ids");
        assert_eq!(pluralize("user"), "users");

        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");

        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");

        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("leaf"), "leaves");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("index"), "indices");
        assert_eq!(pluralize("hero"), "heroes");
        assert_eq!(pluralize("published"), "published");
    }

    #[test]
    fn test_escape_field_name() {
        assert_eq!(escape_field_name("type"), "r#type");
        assert_eq!(escape_field_name("name"), "name");
        assert_eq!(escape_field_name("stgId"), "stg_id");
    }
}
