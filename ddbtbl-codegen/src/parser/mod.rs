//! Table definition parsing and validation

mod metadata;
mod schema_parser;
mod validator;

pub use metadata::*;
pub use schema_parser::*;
pub use validator::*;
