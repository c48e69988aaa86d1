//! Read request builders

use crate::error::{Error, Result};
use crate::key::{Key, KeyAttr, Operator, RangeCondition};
use crate::table::Table;
use crate::traits::{FromItem, QueryInput, ScanInput, ToValue};

/// Get a single item by its primary key.
///
/// # Example
///
/// ```ignore
/// let user: Option<User> = db
///     .table("TUser")
///     .get(Key::hash("uid", 1))
///     .fetch_optional()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct GetItem {
    table: Table,
    key: Key,
}

impl GetItem {
    pub(crate) fn new(table: Table, key: Key) -> Self {
        Self { table, key }
    }

    /// Get the key this request addresses.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Fetch the item, or `None` if it does not exist.
    pub async fn fetch_optional<T: FromItem>(self) -> Result<Option<T>> {
        let item = self
            .table
            .store()
            .get_item(self.table.name(), &self.key)
            .await?;
        item.map(|item| T::from_item(&item)).transpose()
    }

    /// Fetch the item, returning [`Error::NotFound`] if it does not exist.
    pub async fn fetch_one<T: FromItem>(self) -> Result<T> {
        self.fetch_optional().await?.ok_or(Error::NotFound)
    }
}

/// Result ordering for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Ascending range-key order
    #[default]
    Ascending,
    /// Descending range-key order
    Descending,
}

/// A query bound to one hash key, with an optional range-key predicate.
///
/// Queries target the table's primary index unless [`Query::index`] names a
/// secondary index.
#[derive(Debug, Clone)]
pub struct Query {
    table: Table,
    input: QueryInput,
}

impl Query {
    pub(crate) fn new(table: Table, hash: KeyAttr) -> Self {
        Self {
            table,
            input: QueryInput {
                index: None,
                hash,
                range: None,
                limit: None,
                descending: false,
            },
        }
    }

    /// Query a secondary index instead of the primary index.
    pub fn index(mut self, name: &str) -> Self {
        self.input.index = Some(name.to_string());
        self
    }

    /// Restrict results with a predicate on the range key.
    pub fn range(mut self, name: &str, op: Operator, value: impl ToValue) -> Self {
        self.input.range = Some(RangeCondition::new(name, op, value));
        self
    }

    /// Return at most `limit` items.
    pub fn limit(mut self, limit: usize) -> Self {
        self.input.limit = Some(limit);
        self
    }

    /// Set the range-key ordering of results.
    pub fn order(mut self, order: Order) -> Self {
        self.input.descending = order == Order::Descending;
        self
    }

    /// Get the request parameters.
    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    /// Fetch all matching items.
    pub async fn fetch_all<T: FromItem>(self) -> Result<Vec<T>> {
        let items = self
            .table
            .store()
            .query(self.table.name(), self.input)
            .await?;
        items.iter().map(T::from_item).collect()
    }

    /// Fetch the first matching item, or `None`.
    pub async fn fetch_optional<T: FromItem>(self) -> Result<Option<T>> {
        let mut items = self.limit(1).fetch_all::<T>().await?;
        Ok(if items.is_empty() {
            None
        } else {
            Some(items.swap_remove(0))
        })
    }

    /// Fetch the first matching item, returning [`Error::NotFound`] if none match.
    pub async fn fetch_one<T: FromItem>(self) -> Result<T> {
        self.fetch_optional().await?.ok_or(Error::NotFound)
    }

    /// Count matching items.
    pub async fn count(self) -> Result<usize> {
        let items = self
            .table
            .store()
            .query(self.table.name(), self.input)
            .await?;
        Ok(items.len())
    }
}

/// A full table scan.
#[derive(Debug, Clone)]
pub struct Scan {
    table: Table,
    input: ScanInput,
}

impl Scan {
    pub(crate) fn new(table: Table) -> Self {
        Self {
            table,
            input: ScanInput::default(),
        }
    }

    /// Return at most `limit` items.
    pub fn limit(mut self, limit: usize) -> Self {
        self.input.limit = Some(limit);
        self
    }

    /// Fetch all items.
    pub async fn fetch_all<T: FromItem>(self) -> Result<Vec<T>> {
        let items = self
            .table
            .store()
            .scan(self.table.name(), self.input)
            .await?;
        items.iter().map(T::from_item).collect()
    }

    /// Count items.
    pub async fn count(self) -> Result<usize> {
        let items = self
            .table
            .store()
            .scan(self.table.name(), self.input)
            .await?;
        Ok(items.len())
    }
}
