//! Connection and table handles

use std::fmt;
use std::sync::Arc;

use crate::batch::{BatchGet, BatchWrite};
use crate::key::{Key, KeyAttr};
use crate::query::{GetItem, Query, Scan};
use crate::traits::{Store, ToItem, ToValue};
use crate::write::{Delete, Put, Update};

/// Top-level connection object.
///
/// Cloning is cheap: every clone shares the same underlying store.
///
/// # Example
///
/// ```ignore
/// use ddbtbl::{Db, MemoryStore};
///
/// let db = Db::new(MemoryStore::new());
/// let users = db.table("TUser");
/// ```
#[derive(Clone)]
pub struct Db {
    store: Arc<dyn Store>,
}

impl Db {
    /// Wrap a store backend.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap a store backend that is already shared.
    pub fn from_shared(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get a handle to the table named `name`.
    pub fn table(&self, name: &str) -> Table {
        Table {
            store: Arc::clone(&self.store),
            name: Arc::from(name),
        }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

/// A handle to one table of a store.
///
/// All request builders start here.
#[derive(Clone)]
pub struct Table {
    store: Arc<dyn Store>,
    name: Arc<str>,
}

impl Table {
    /// The store-side table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Get the item addressed by `key`.
    pub fn get(&self, key: Key) -> GetItem {
        GetItem::new(self.clone(), key)
    }

    /// Query items sharing the hash key `hash_name = hash_value`.
    pub fn query(&self, hash_name: &str, hash_value: impl ToValue) -> Query {
        Query::new(self.clone(), KeyAttr::new(hash_name, hash_value))
    }

    /// Scan the whole table.
    pub fn scan(&self) -> Scan {
        Scan::new(self.clone())
    }

    /// Create or replace an item.
    pub fn put<T: ToItem + ?Sized>(&self, item: &T) -> Put {
        Put::new(self.clone(), item.to_item())
    }

    /// Modify the item addressed by `key`.
    pub fn update(&self, key: Key) -> Update {
        Update::new(self.clone(), key)
    }

    /// Delete the item addressed by `key`.
    pub fn delete(&self, key: Key) -> Delete {
        Delete::new(self.clone(), key)
    }

    /// Fetch many items by key.
    pub fn batch_get(&self, keys: Vec<Key>) -> BatchGet {
        BatchGet::new(self.clone(), keys)
    }

    /// Start an empty batch write.
    pub fn batch_write(&self) -> BatchWrite {
        BatchWrite::new(self.clone())
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish()
    }
}
