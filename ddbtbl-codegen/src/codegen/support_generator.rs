//! Support unit generator - the accessor types every table API returns
//!
//! Emitted once per output directory regardless of table count. Each
//! accessor closes over a table handle, an optional index name and the key
//! it was built from.

/// File name of the shared support unit
pub const SUPPORT_FILE: &str = "support.rs";

/// Module name of the shared support unit
pub const SUPPORT_MODULE: &str = "support";

/// Generate the source of the shared support unit
pub fn generate_support_source() -> String {
    r#"use std::collections::HashSet;

use ddbtbl::{BatchGet, BatchWrite, Delete, GetItem, Key, KeyAttr, Operator, Query, Table, ToValue, Update};

/// Accessor for one item addressed by its primary key.
#[derive(Debug, Clone)]
pub struct WithPrimaryIndex {
    table: Table,
    key: Key,
}

impl WithPrimaryIndex {
    pub fn new(table: Table, key: Key) -> Self {
        Self { table, key }
    }

    /// The key this accessor is bound to.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Get the item.
    pub fn get(&self) -> GetItem {
        self.table.get(self.key.clone())
    }

    /// Update the item.
    pub fn update(&self) -> Update {
        self.table.update(self.key.clone())
    }

    /// Delete the item.
    pub fn delete(&self) -> Delete {
        self.table.delete(self.key.clone())
    }
}

/// Accessor for the items matching one key of a secondary index.
///
/// Secondary indexes are read paths only.
#[derive(Debug, Clone)]
pub struct WithSecondaryIndex {
    table: Table,
    index: &'static str,
    key: Key,
}

impl WithSecondaryIndex {
    pub fn new(table: Table, index: &'static str, key: Key) -> Self {
        Self { table, index, key }
    }

    /// The key this accessor is bound to.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Query the items matching the key.
    pub fn get(&self) -> Query {
        let query = self
            .table
            .query(&self.key.hash.name, &self.key.hash.value)
            .index(self.index);
        match &self.key.range {
            Some(range) => query.range(&range.name, Operator::Equal, &range.value),
            None => query,
        }
    }
}

/// Range accessor over the primary index: hash key bound, range key open.
#[derive(Debug, Clone)]
pub struct QueryWithPrimaryIndex {
    table: Table,
    hash: KeyAttr,
    range_name: &'static str,
}

impl QueryWithPrimaryIndex {
    pub fn new(table: Table, hash: KeyAttr, range_name: &'static str) -> Self {
        Self {
            table,
            hash,
            range_name,
        }
    }

    /// Every item under the hash key.
    pub fn all(&self) -> Query {
        self.table.query(&self.hash.name, &self.hash.value)
    }

    /// The items under the hash key whose range key satisfies `op value`.
    pub fn where_sk(&self, op: Operator, value: impl ToValue) -> Query {
        self.all().range(self.range_name, op, value)
    }
}

/// Range accessor over a secondary index: hash key bound, range key open.
#[derive(Debug, Clone)]
pub struct QueryWithSecondaryIndex {
    table: Table,
    index: &'static str,
    hash: KeyAttr,
    range_name: &'static str,
}

impl QueryWithSecondaryIndex {
    pub fn new(table: Table, index: &'static str, hash: KeyAttr, range_name: &'static str) -> Self {
        Self {
            table,
            index,
            hash,
            range_name,
        }
    }

    /// Every item under the hash key.
    pub fn all(&self) -> Query {
        self.table
            .query(&self.hash.name, &self.hash.value)
            .index(self.index)
    }

    /// The items under the hash key whose range key satisfies `op value`.
    pub fn where_sk(&self, op: Operator, value: impl ToValue) -> Query {
        self.all().range(self.range_name, op, value)
    }
}

/// Batch accessor over distinct primary keys.
#[derive(Debug, Clone)]
pub struct BatchWithPrimaryIndex {
    table: Table,
    keys: Vec<Key>,
}

impl BatchWithPrimaryIndex {
    pub fn new(table: Table, keys: Vec<Key>) -> Self {
        Self { table, keys }
    }

    /// The distinct keys this accessor is bound to.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Get every item.
    pub fn get(&self) -> BatchGet {
        self.table.batch_get(self.keys.clone())
    }

    /// Delete every item.
    pub fn delete(&self) -> BatchWrite {
        self.table.batch_write().delete(self.keys.clone())
    }
}

/// Batch accessor over distinct keys of a secondary index.
#[derive(Debug, Clone)]
pub struct BatchWithSecondaryIndex {
    table: Table,
    index: &'static str,
    keys: Vec<Key>,
}

impl BatchWithSecondaryIndex {
    pub fn new(table: Table, index: &'static str, keys: Vec<Key>) -> Self {
        Self { table, index, keys }
    }

    /// The distinct keys this accessor is bound to.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Get every item matching any of the keys.
    pub fn get(&self) -> BatchGet {
        self.table.batch_get(self.keys.clone()).index(self.index)
    }
}

/// Drop repeated keys, keeping the first occurrence of each.
pub fn unique_keys(keys: impl IntoIterator<Item = Key>) -> Vec<Key> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
"#
    .to_string()
}
