//! Item mapping traits

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::traits::FromValue;
use crate::value::Value;

/// A stored item: attribute names mapped to values.
pub type Item = BTreeMap<String, Value>;

/// Extension trait for typed access to item attributes.
pub trait ItemExt {
    /// Get a typed attribute value by name.
    ///
    /// A missing attribute reads as null, so `Option<T>` targets yield `None`
    /// and every other target reports [`Error::AttributeNotFound`].
    fn get_as<T: FromValue>(&self, name: &str) -> Result<T>;
}

impl ItemExt for Item {
    fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        match self.get(name) {
            Some(value) => T::from_value(value.clone()),
            None => T::from_value(Value::Null)
                .map_err(|_| Error::AttributeNotFound(name.to_string())),
        }
    }
}

/// Trait for types that can be constructed from a stored item.
///
/// This trait is typically implemented via the `#[derive(FromItem)]` macro.
///
/// # Manual Implementation
///
/// ```ignore
/// use ddbtbl::{FromItem, Item, ItemExt, Result};
///
/// pub struct User {
///     pub uid: i32,
///     pub name: String,
/// }
///
/// impl FromItem for User {
///     fn from_item(item: &Item) -> Result<Self> {
///         Ok(Self {
///             uid: item.get_as("uid")?,
///             name: item.get_as("name")?,
///         })
///     }
/// }
/// ```
pub trait FromItem: Sized {
    /// Construct an instance of this type from a stored item.
    fn from_item(item: &Item) -> Result<Self>;
}

/// Trait for types that can be written as a stored item.
///
/// This trait is typically implemented via the `#[derive(ToItem)]` macro.
/// Null values are left out of the item rather than stored.
pub trait ToItem {
    /// Convert this value into an item.
    fn to_item(&self) -> Item;
}

impl FromItem for Item {
    fn from_item(item: &Item) -> Result<Self> {
        Ok(item.clone())
    }
}

impl ToItem for Item {
    fn to_item(&self) -> Item {
        self.clone()
    }
}

impl<T: ToItem> ToItem for &T {
    fn to_item(&self) -> Item {
        (*self).to_item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_as_missing() {
        let mut item = Item::new();
        item.insert("uid".into(), Value::N("1".into()));

        let uid: i32 = item.get_as("uid").unwrap();
        assert_eq!(uid, 1);

        let nick: Option<String> = item.get_as("nick").unwrap();
        assert_eq!(nick, None);

        let err = item.get_as::<String>("name").unwrap_err();
        assert!(matches!(err, Error::AttributeNotFound(ref n) if n == "name"));
    }
}
