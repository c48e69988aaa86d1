//! Batch operations for ddbtbl

use crate::error::Result;
use crate::key::Key;
use crate::table::Table;
use crate::traits::{BatchGetInput, BatchWriteInput, BatchWriteOutput, FromItem, Item, ToItem};

/// Maximum number of keys a single batch get request may carry.
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// Maximum number of put and delete requests a single batch write may carry.
pub const MAX_BATCH_WRITE_REQUESTS: usize = 25;

/// A batch get builder.
///
/// Keys are sent in chunks of [`MAX_BATCH_GET_KEYS`]. The store rejects a
/// request that names the same key twice, so callers must deduplicate.
///
/// # Example
///
/// ```ignore
/// let users: Vec<User> = table
///     .batch_get(vec![Key::hash("uid", 1), Key::hash("uid", 3)])
///     .fetch_all()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct BatchGet {
    table: Table,
    input: BatchGetInput,
}

impl BatchGet {
    pub(crate) fn new(table: Table, keys: Vec<Key>) -> Self {
        Self {
            table,
            input: BatchGetInput { index: None, keys },
        }
    }

    /// Look the keys up on a secondary index instead of the primary index.
    pub fn index(mut self, name: &str) -> Self {
        self.input.index = Some(name.to_string());
        self
    }

    /// Get the keys this request will fetch.
    pub fn keys(&self) -> &[Key] {
        &self.input.keys
    }

    /// Fetch all items found for the keys. Missing keys are skipped.
    pub async fn fetch_all<T: FromItem>(self) -> Result<Vec<T>> {
        let mut results = Vec::with_capacity(self.input.keys.len());
        for chunk in self.input.keys.chunks(MAX_BATCH_GET_KEYS) {
            let input = BatchGetInput {
                index: self.input.index.clone(),
                keys: chunk.to_vec(),
            };
            let items = self.table.store().batch_get(self.table.name(), input).await?;
            for item in &items {
                results.push(T::from_item(item)?);
            }
        }
        Ok(results)
    }
}

/// A batch write builder combining puts and deletes.
///
/// Requests are sent in chunks of [`MAX_BATCH_WRITE_REQUESTS`], puts first.
#[derive(Debug, Clone)]
pub struct BatchWrite {
    table: Table,
    input: BatchWriteInput,
}

impl BatchWrite {
    pub(crate) fn new(table: Table) -> Self {
        Self {
            table,
            input: BatchWriteInput::default(),
        }
    }

    /// Queue items to put.
    pub fn put<T: ToItem>(mut self, items: &[T]) -> Self {
        self.input.puts.extend(items.iter().map(ToItem::to_item));
        self
    }

    /// Queue keys to delete.
    pub fn delete(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.input.deletes.extend(keys);
        self
    }

    /// Get the queued items and keys.
    pub fn input(&self) -> &BatchWriteInput {
        &self.input
    }

    /// Execute the batch write.
    pub async fn run(self) -> Result<BatchWriteOutput> {
        let mut requests: Vec<Request> = Vec::new();
        requests.extend(self.input.puts.into_iter().map(Request::Put));
        requests.extend(self.input.deletes.into_iter().map(Request::Delete));

        let mut output = BatchWriteOutput::default();
        for chunk in requests.chunks(MAX_BATCH_WRITE_REQUESTS) {
            let mut input = BatchWriteInput::default();
            for request in chunk {
                match request {
                    Request::Put(item) => input.puts.push(item.clone()),
                    Request::Delete(key) => input.deletes.push(key.clone()),
                }
            }
            let written = self
                .table
                .store()
                .batch_write(self.table.name(), input)
                .await?;
            output.written += written.written;
        }
        Ok(output)
    }
}

enum Request {
    Put(Item),
    Delete(Key),
}
