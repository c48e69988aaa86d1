//! Single-item write request builders

use crate::error::Result;
use crate::key::Key;
use crate::table::Table;
use crate::traits::{FromItem, Item, ToValue, UpdateAction};

/// Create or replace an item.
#[derive(Debug, Clone)]
pub struct Put {
    table: Table,
    item: Item,
}

impl Put {
    pub(crate) fn new(table: Table, item: Item) -> Self {
        Self { table, item }
    }

    /// Get the item that will be written.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Execute the put.
    pub async fn run(self) -> Result<()> {
        self.table
            .store()
            .put_item(self.table.name(), self.item)
            .await
    }
}

/// Modify the attributes of one item.
///
/// # Example
///
/// ```ignore
/// table
///     .update(Key::hash("uid", 1))
///     .set("name", "fuga")
///     .add("visits", 1)
///     .run()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Update {
    table: Table,
    key: Key,
    actions: Vec<UpdateAction>,
}

impl Update {
    pub(crate) fn new(table: Table, key: Key) -> Self {
        Self {
            table,
            key,
            actions: Vec::new(),
        }
    }

    /// Set an attribute to a value.
    pub fn set(mut self, name: &str, value: impl ToValue) -> Self {
        self.actions
            .push(UpdateAction::Set(name.to_string(), value.to_value()));
        self
    }

    /// Remove an attribute.
    pub fn remove(mut self, name: &str) -> Self {
        self.actions.push(UpdateAction::Remove(name.to_string()));
        self
    }

    /// Add `delta` to a number attribute.
    pub fn add(mut self, name: &str, delta: i64) -> Self {
        self.actions.push(UpdateAction::Add(name.to_string(), delta));
        self
    }

    /// Get the queued actions.
    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    /// Execute the update.
    pub async fn run(self) -> Result<()> {
        self.table
            .store()
            .update_item(self.table.name(), &self.key, self.actions)
            .await
            .map(|_| ())
    }

    /// Execute the update and return the item as it is afterwards.
    pub async fn fetch_one<T: FromItem>(self) -> Result<T> {
        let item = self
            .table
            .store()
            .update_item(self.table.name(), &self.key, self.actions)
            .await?;
        T::from_item(&item)
    }
}

/// Delete one item.
#[derive(Debug, Clone)]
pub struct Delete {
    table: Table,
    key: Key,
}

impl Delete {
    pub(crate) fn new(table: Table, key: Key) -> Self {
        Self { table, key }
    }

    /// Get the key this request addresses.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Execute the delete.
    pub async fn run(self) -> Result<()> {
        self.table
            .store()
            .delete_item(self.table.name(), &self.key)
            .await
    }
}
