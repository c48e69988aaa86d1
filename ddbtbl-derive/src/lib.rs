//! Derive macros for the ddbtbl key-value table runtime
//!
//! This crate provides the following derive macros:
//! - `FromItem` - Maps stored items to Rust structs
//! - `ToItem` - Converts Rust structs to stored items
//!
//! These macros are re-exported from the `ddbtbl` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod from_item;
mod to_item;

/// Derive macro for mapping stored items to Rust structs.
///
/// This macro generates an implementation of the `FromItem` trait.
/// `Option<T>` fields read a missing attribute as `None`; any other field
/// type reports `Error::AttributeNotFound`.
///
/// # Attributes
///
/// - `#[ddbtbl(rename = "attr_name")]` - Use a different attribute name for this field
/// - `#[ddbtbl(skip)]` - Skip this field; it is filled with `Default::default()`
///
/// # Example
///
/// ```ignore
/// use ddbtbl::FromItem;
///
/// #[derive(FromItem)]
/// pub struct User {
///     pub uid: i32,
///     #[ddbtbl(rename = "user_name")]
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(FromItem, attributes(ddbtbl))]
pub fn derive_from_item(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_item::derive_from_item_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive macro for converting Rust structs to stored items.
///
/// This macro generates an implementation of the `ToItem` trait. Fields
/// whose value converts to `Value::Null` (e.g. `None`) are left out.
///
/// # Attributes
///
/// - `#[ddbtbl(rename = "attr_name")]` - Use a different attribute name for this field
/// - `#[ddbtbl(skip)]` - Never write this field
///
/// # Example
///
/// ```ignore
/// use ddbtbl::ToItem;
///
/// #[derive(ToItem)]
/// pub struct User {
///     pub uid: i32,
///     pub name: String,
///     pub nick: Option<String>,
/// }
/// ```
#[proc_macro_derive(ToItem, attributes(ddbtbl))]
pub fn derive_to_item(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_item::derive_to_item_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
