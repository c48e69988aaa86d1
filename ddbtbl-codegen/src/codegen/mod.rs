//! Code generation module

mod api_generator;
mod code_generator;
mod descriptor_generator;
mod gen_def;
mod naming;
mod support_generator;
mod type_resolver;

pub use api_generator::*;
pub use code_generator::*;
pub use descriptor_generator::*;
pub use gen_def::*;
pub use naming::*;
pub use support_generator::*;
pub use type_resolver::*;

use crate::error::{CodegenError, Result};

/// First line of every generated source unit.
pub const GENERATED_HEADER: &str = "// Code generated by ddbtbl-codegen. DO NOT EDIT.";

/// Parse and pretty-print a generated source unit, then prepend the header.
///
/// `unit` names the table (or shared unit) in the error when the source does
/// not parse.
pub fn render_unit(unit: &str, source: &str) -> Result<String> {
    let file = syn::parse_file(source).map_err(|e| CodegenError::RenderError {
        table: unit.to_string(),
        message: e.to_string(),
    })?;
    Ok(format!("{}\n\n{}", GENERATED_HEADER, prettyplease::unparse(&file)))
}
