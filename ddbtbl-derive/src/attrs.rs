//! `#[ddbtbl(...)]` field attribute parsing shared by both derives

use syn::punctuated::Punctuated;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result, Token};

/// Per-field configuration
pub struct FieldConfig {
    /// The field identifier
    pub ident: Ident,
    /// Attribute name to use (may be renamed)
    pub attr_name: String,
    /// Whether to skip this field
    pub skip: bool,
    /// The field type
    pub ty: syn::Type,
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut attr_name = ident.to_string();
    if let Some(raw) = attr_name.strip_prefix("r#") {
        attr_name = raw.to_string();
    }
    let mut skip = false;

    for attr in &field.attrs {
        if attr.path().is_ident("ddbtbl") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    attr_name = lit.value();
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown ddbtbl attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    Ok(FieldConfig {
        ident,
        attr_name,
        skip,
        ty: field.ty.clone(),
    })
}

/// Collect the configuration of every named field of a struct.
pub fn field_configs(input: &DeriveInput) -> Result<Vec<FieldConfig>> {
    let fields: &Punctuated<Field, Token![,]> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    fields.iter().map(parse_field_config).collect()
}
