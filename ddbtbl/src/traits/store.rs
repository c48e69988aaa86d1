//! Store trait for key-value table backends

use async_trait::async_trait;

use crate::error::Result;
use crate::key::{Key, KeyAttr, RangeCondition};
use crate::traits::Item;
use crate::value::Value;

/// A single modification applied by an update request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Set an attribute to a value
    Set(String, Value),
    /// Remove an attribute
    Remove(String),
    /// Add a delta to a number attribute (missing attributes start at zero)
    Add(String, i64),
}

/// Parameters of a query against the table or one of its secondary indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInput {
    /// Secondary index to query, or `None` for the table's primary index
    pub index: Option<String>,
    /// Hash key the query is bound to
    pub hash: KeyAttr,
    /// Optional predicate on the range key
    pub range: Option<RangeCondition>,
    /// Maximum number of items to return
    pub limit: Option<usize>,
    /// Return items in descending range-key order
    pub descending: bool,
}

/// Parameters of a full table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanInput {
    /// Maximum number of items to return
    pub limit: Option<usize>,
}

/// Parameters of a batch get.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetInput {
    /// Secondary index the keys refer to, or `None` for the primary index
    pub index: Option<String>,
    /// Keys to fetch; must not contain duplicates
    pub keys: Vec<Key>,
}

/// Parameters of a batch write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteInput {
    /// Items to put
    pub puts: Vec<Item>,
    /// Keys to delete
    pub deletes: Vec<Key>,
}

/// Result of a batch write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchWriteOutput {
    /// Number of write requests applied
    pub written: usize,
}

/// Trait for key-value store backends.
///
/// This is the full set of primitives generated accessor APIs forward to.
/// Implementations address tables by name and items by [`Key`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a single item by its primary key.
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    /// Create or replace an item.
    async fn put_item(&self, table: &str, item: Item) -> Result<()>;

    /// Modify an item in place, creating it when absent, and return the result.
    async fn update_item(&self, table: &str, key: &Key, actions: Vec<UpdateAction>)
        -> Result<Item>;

    /// Delete an item by its primary key. Deleting a missing item succeeds.
    async fn delete_item(&self, table: &str, key: &Key) -> Result<()>;

    /// Fetch items sharing a hash key, ordered by range key.
    async fn query(&self, table: &str, input: QueryInput) -> Result<Vec<Item>>;

    /// Fetch every item of a table.
    async fn scan(&self, table: &str, input: ScanInput) -> Result<Vec<Item>>;

    /// Fetch many items by key in one request.
    async fn batch_get(&self, table: &str, input: BatchGetInput) -> Result<Vec<Item>>;

    /// Apply many puts and deletes in one request.
    async fn batch_write(&self, table: &str, input: BatchWriteInput) -> Result<BatchWriteOutput>;
}
