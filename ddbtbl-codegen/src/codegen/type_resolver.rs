//! Attribute type to Rust type mapping

use crate::parser::AttrType;

/// Represents a Rust type for code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RustType {
    I32,
    I64,
    String,
    Bytes,
}

impl RustType {
    /// Get the type string for code generation
    pub fn to_type_string(&self) -> String {
        match self {
            RustType::I32 => "i32".to_string(),
            RustType::I64 => "i64".to_string(),
            RustType::String => "String".to_string(),
            RustType::Bytes => "Vec<u8>".to_string(),
        }
    }

    /// Get the type string for function parameters (use references for strings)
    pub fn to_param_type_string(&self) -> String {
        if self.is_copy() {
            return self.to_type_string();
        }
        match self {
            RustType::Bytes => "&[u8]".to_string(),
            _ => "&str".to_string(),
        }
    }

    /// Check if this type implements Copy
    pub fn is_copy(&self) -> bool {
        !matches!(self, RustType::String | RustType::Bytes)
    }
}

/// Resolve attribute types to Rust types
pub struct TypeResolver;

impl TypeResolver {
    /// Get the Rust type for an attribute type
    pub fn resolve(attr_type: AttrType) -> RustType {
        match attr_type {
            AttrType::String => RustType::String,
            AttrType::Int => RustType::I32,
            AttrType::Int64 => RustType::I64,
            AttrType::Bytes => RustType::Bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(TypeResolver::resolve(AttrType::String), RustType::String);
        assert_eq!(TypeResolver::resolve(AttrType::Int), RustType::I32);
        assert_eq!(TypeResolver::resolve(AttrType::Int64), RustType::I64);
        assert_eq!(TypeResolver::resolve(AttrType::Bytes), RustType::Bytes);
    }

    #[test]
    fn test_type_string() {
        assert_eq!(RustType::I64.to_type_string(), "i64");
        assert_eq!(RustType::Bytes.to_type_string(), "Vec<u8>");
    }

    #[test]
    fn test_param_type_string() {
        assert_eq!(RustType::String.to_param_type_string(), "&str");
        assert_eq!(RustType::Bytes.to_param_type_string(), "&[u8]");
        assert_eq!(RustType::I32.to_param_type_string(), "i32");
        assert_eq!(RustType::I64.to_param_type_string(), "i64");
        assert!(RustType::I32.is_copy());
        assert!(!RustType::String.is_copy());
    }
}
