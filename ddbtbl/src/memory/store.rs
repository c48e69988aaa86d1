//! In-memory store backend

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::batch::{MAX_BATCH_GET_KEYS, MAX_BATCH_WRITE_REQUESTS};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::spec::{KeySpec, TableSpec};
use crate::traits::{
    BatchGetInput, BatchWriteInput, BatchWriteOutput, Item, QueryInput, ScanInput, Store,
    UpdateAction,
};
use crate::value::Value;

/// A store that keeps every table in process memory.
///
/// Tables must be provisioned from a [`TableSpec`] before use. The store
/// enforces the request rules of a hosted key-value service: key attributes
/// must match the table's key schema, batch requests are size limited and may
/// not name the same key twice, and secondary indexes are read-only.
///
/// # Example
///
/// ```ignore
/// use ddbtbl::{Db, MemoryStore, TableSpec};
///
/// let spec = TableSpec::from_descriptor_json(include_str!("t_user.json"))?;
/// let db = Db::new(MemoryStore::with_tables([spec]));
/// ```
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemTable>>,
}

struct MemTable {
    spec: TableSpec,
    items: BTreeMap<Key, Item>,
}

impl MemTable {
    fn new(spec: TableSpec) -> Self {
        Self {
            spec,
            items: BTreeMap::new(),
        }
    }

    /// Resolve the key schema a read targets.
    fn key_spec(&self, index: Option<&str>) -> Result<&KeySpec> {
        match index {
            None => Ok(&self.spec.key),
            Some(name) => self.spec.index(name).map(|i| &i.key).ok_or_else(|| {
                Error::Validation(format!(
                    "table `{}` has no index `{}`",
                    self.spec.name, name
                ))
            }),
        }
    }

    /// Validate an item against the table key and every index key, returning
    /// the primary key it is stored under.
    fn check_item(&self, item: &Item) -> Result<Key> {
        let key = self.spec.key.key_of(item)?;
        for index in &self.spec.indexes {
            index.key.check_types(item)?;
        }
        Ok(key)
    }
}

impl MemoryStore {
    /// Create a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given tables provisioned and empty.
    pub fn with_tables(specs: impl IntoIterator<Item = TableSpec>) -> Self {
        let tables = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), MemTable::new(spec)))
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Provision an empty table.
    pub async fn create_table(&self, spec: TableSpec) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&spec.name) {
            return Err(Error::Validation(format!(
                "table `{}` already exists",
                spec.name
            )));
        }
        tables.insert(spec.name.clone(), MemTable::new(spec));
        Ok(())
    }

    /// Get the names of all provisioned tables, sorted.
    pub async fn table_names(&self) -> Vec<String> {
        let tables = self.tables.read().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the key schema a table was provisioned with.
    pub async fn table_spec(&self, table: &str) -> Result<TableSpec> {
        let tables = self.tables.read().await;
        lookup(&tables, table).map(|t| t.spec.clone())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

fn lookup<'a>(tables: &'a HashMap<String, MemTable>, name: &str) -> Result<&'a MemTable> {
    tables
        .get(name)
        .ok_or_else(|| Error::TableNotFound(name.to_string()))
}

fn lookup_mut<'a>(
    tables: &'a mut HashMap<String, MemTable>,
    name: &str,
) -> Result<&'a mut MemTable> {
    tables
        .get_mut(name)
        .ok_or_else(|| Error::TableNotFound(name.to_string()))
}

fn reject_duplicates<'a>(keys: impl IntoIterator<Item = &'a Key>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(Error::Validation(
                "provided list of item keys contains duplicates".to_string(),
            ));
        }
    }
    Ok(())
}

fn is_key_attr(spec: &KeySpec, name: &str) -> bool {
    spec.hash.name == name || spec.range.as_ref().map_or(false, |r| r.name == name)
}

fn apply_action(spec: &KeySpec, item: &mut Item, action: UpdateAction) -> Result<()> {
    let name = match &action {
        UpdateAction::Set(name, _) | UpdateAction::Remove(name) | UpdateAction::Add(name, _) => {
            name
        }
    };
    if is_key_attr(spec, name) {
        return Err(Error::Validation(format!(
            "cannot update key attribute `{}`",
            name
        )));
    }
    match action {
        UpdateAction::Set(name, Value::Null) | UpdateAction::Remove(name) => {
            item.remove(&name);
        }
        UpdateAction::Set(name, value) => {
            item.insert(name, value);
        }
        UpdateAction::Add(name, delta) => {
            let current = match item.get(&name) {
                None => 0,
                Some(Value::N(n)) => n.parse::<i64>().map_err(|_| {
                    Error::Validation(format!("attribute `{}` is not an integer", name))
                })?,
                Some(other) => {
                    return Err(Error::Validation(format!(
                        "cannot add to attribute `{}` of type {}",
                        name,
                        other.type_name()
                    )))
                }
            };
            let sum = current.checked_add(delta).ok_or_else(|| {
                Error::Validation(format!("attribute `{}` overflows on add", name))
            })?;
            item.insert(name, Value::from(sum));
        }
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let t = lookup(&tables, table)?;
        t.spec.key.check_key(key)?;
        Ok(t.items.get(key).cloned())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let t = lookup_mut(&mut tables, table)?;
        let key = t.check_item(&item)?;
        t.items.insert(key, item);
        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &Key,
        actions: Vec<UpdateAction>,
    ) -> Result<Item> {
        let mut tables = self.tables.write().await;
        let t = lookup_mut(&mut tables, table)?;
        t.spec.key.check_key(key)?;

        let mut item = t.items.get(key).cloned().unwrap_or_else(|| key.to_item());
        for action in actions {
            apply_action(&t.spec.key, &mut item, action)?;
        }
        t.check_item(&item)?;
        t.items.insert(key.clone(), item.clone());
        Ok(item)
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        let mut tables = self.tables.write().await;
        let t = lookup_mut(&mut tables, table)?;
        t.spec.key.check_key(key)?;
        t.items.remove(key);
        Ok(())
    }

    async fn query(&self, table: &str, input: QueryInput) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let t = lookup(&tables, table)?;
        let key_spec = t.key_spec(input.index.as_deref())?;

        if input.hash.name != key_spec.hash.name {
            return Err(Error::Validation(format!(
                "query must be bound to hash key `{}`, got `{}`",
                key_spec.hash.name, input.hash.name
            )));
        }
        if let Some(cond) = &input.range {
            match &key_spec.range {
                Some(range) if range.name == cond.name => {}
                Some(range) => {
                    return Err(Error::Validation(format!(
                        "range condition must be on `{}`, got `{}`",
                        range.name, cond.name
                    )))
                }
                None => {
                    return Err(Error::Validation(
                        "range condition on a key without a range attribute".to_string(),
                    ))
                }
            }
        }

        let mut items: Vec<Item> = t
            .items
            .values()
            .filter(|item| key_spec.covers(item) && input.hash.matches(item))
            .filter(|item| input.range.as_ref().map_or(true, |c| c.matches(item)))
            .cloned()
            .collect();

        if let Some(range) = &key_spec.range {
            items.sort_by(|a, b| match (a.get(&range.name), b.get(&range.name)) {
                (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });
        }
        if input.descending {
            items.reverse();
        }
        if let Some(limit) = input.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    async fn scan(&self, table: &str, input: ScanInput) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let t = lookup(&tables, table)?;
        let limit = input.limit.unwrap_or(usize::MAX);
        Ok(t.items.values().take(limit).cloned().collect())
    }

    async fn batch_get(&self, table: &str, input: BatchGetInput) -> Result<Vec<Item>> {
        if input.keys.len() > MAX_BATCH_GET_KEYS {
            return Err(Error::Validation(format!(
                "too many keys in batch get: {} (max {})",
                input.keys.len(),
                MAX_BATCH_GET_KEYS
            )));
        }
        reject_duplicates(&input.keys)?;

        let tables = self.tables.read().await;
        let t = lookup(&tables, table)?;
        let key_spec = t.key_spec(input.index.as_deref())?;
        for key in &input.keys {
            key_spec.check_key(key)?;
        }

        let mut items = Vec::new();
        match input.index {
            None => {
                for key in &input.keys {
                    if let Some(item) = t.items.get(key) {
                        items.push(item.clone());
                    }
                }
            }
            Some(_) => {
                for key in &input.keys {
                    items.extend(
                        t.items
                            .values()
                            .filter(|item| key_spec.covers(item) && key.matches(item))
                            .cloned(),
                    );
                }
            }
        }
        Ok(items)
    }

    async fn batch_write(&self, table: &str, input: BatchWriteInput) -> Result<BatchWriteOutput> {
        let requests = input.puts.len() + input.deletes.len();
        if requests > MAX_BATCH_WRITE_REQUESTS {
            return Err(Error::Validation(format!(
                "too many requests in batch write: {} (max {})",
                requests, MAX_BATCH_WRITE_REQUESTS
            )));
        }

        let mut tables = self.tables.write().await;
        let t = lookup_mut(&mut tables, table)?;

        let mut put_keys = Vec::with_capacity(input.puts.len());
        for item in &input.puts {
            put_keys.push(t.check_item(item)?);
        }
        for key in &input.deletes {
            t.spec.key.check_key(key)?;
        }
        reject_duplicates(put_keys.iter().chain(&input.deletes))?;

        for (key, item) in put_keys.into_iter().zip(input.puts) {
            t.items.insert(key, item);
        }
        for key in &input.deletes {
            t.items.remove(key);
        }
        Ok(BatchWriteOutput { written: requests })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeyAttr, Operator, RangeCondition};
    use crate::spec::AttrSpec;
    use crate::value::ScalarType;

    fn ranking_spec() -> TableSpec {
        TableSpec::new(
            "TUserStageRanking",
            KeySpec::composite(
                AttrSpec::new("uid", ScalarType::N),
                AttrSpec::new("stg_id", ScalarType::N),
            ),
        )
        .with_index(
            "pkey-index",
            KeySpec::composite(
                AttrSpec::new("pkey", ScalarType::S),
                AttrSpec::new("score", ScalarType::N),
            ),
        )
    }

    fn ranking(uid: i32, stg_id: i64, pkey: &str, score: i32) -> Item {
        let mut item = Key::composite("uid", uid, "stg_id", stg_id).to_item();
        item.insert("pkey".into(), Value::from(pkey));
        item.insert("score".into(), Value::from(score));
        item
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::with_tables([ranking_spec()]);
        for (uid, stg_id, score) in [(1, 1, 30), (1, 2, 10), (1, 3, 20), (2, 1, 50)] {
            store
                .put_item("TUserStageRanking", ranking(uid, stg_id, "stage", score))
                .await
                .unwrap();
        }
        store
    }

    fn query(hash: i32) -> QueryInput {
        QueryInput {
            index: None,
            hash: KeyAttr::new("uid", hash),
            range: None,
            limit: None,
            descending: false,
        }
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = MemoryStore::new();
        let err = store.get_item("Nope", &Key::hash("uid", 1)).await.unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_table_twice_rejected() {
        let store = MemoryStore::new();
        store.create_table(ranking_spec()).await.unwrap();
        assert!(store.create_table(ranking_spec()).await.is_err());
        assert_eq!(store.table_names().await, vec!["TUserStageRanking"]);
    }

    #[tokio::test]
    async fn test_put_requires_key_attributes() {
        let store = MemoryStore::with_tables([ranking_spec()]);
        let item = Key::hash("uid", 1).to_item();
        let err = store.put_item("TUserStageRanking", item).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_put_checks_index_key_types() {
        let store = MemoryStore::with_tables([ranking_spec()]);
        let mut item = ranking(1, 1, "stage", 1);
        item.insert("score".into(), Value::from("high"));
        assert!(store.put_item("TUserStageRanking", item).await.is_err());
    }

    #[tokio::test]
    async fn test_query_orders_by_range_key() {
        let store = seeded().await;
        let items = store.query("TUserStageRanking", query(1)).await.unwrap();
        let stages: Vec<&Value> = items.iter().map(|i| &i["stg_id"]).collect();
        assert_eq!(stages, vec![&Value::from(1i64), &Value::from(2i64), &Value::from(3i64)]);

        let mut input = query(1);
        input.descending = true;
        input.limit = Some(1);
        let items = store.query("TUserStageRanking", input).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["stg_id"], Value::from(3i64));
    }

    #[tokio::test]
    async fn test_query_range_condition() {
        let store = seeded().await;
        let mut input = query(1);
        input.range = Some(RangeCondition::new("stg_id", Operator::GreaterOrEqual, 2i64));
        let items = store.query("TUserStageRanking", input).await.unwrap();
        assert_eq!(items.len(), 2);

        let mut input = query(1);
        input.range = Some(RangeCondition::new("score", Operator::Equal, 10));
        assert!(store.query("TUserStageRanking", input).await.is_err());
    }

    #[tokio::test]
    async fn test_query_secondary_index() {
        let store = seeded().await;
        let input = QueryInput {
            index: Some("pkey-index".into()),
            hash: KeyAttr::new("pkey", "stage"),
            range: Some(RangeCondition::new("score", Operator::Greater, 15)),
            limit: None,
            descending: false,
        };
        let items = store.query("TUserStageRanking", input).await.unwrap();
        let scores: Vec<&Value> = items.iter().map(|i| &i["score"]).collect();
        assert_eq!(scores, vec![&Value::from(20), &Value::from(30), &Value::from(50)]);
    }

    #[tokio::test]
    async fn test_update_upserts_and_protects_keys() {
        let store = seeded().await;
        let key = Key::composite("uid", 9, "stg_id", 1i64);
        let item = store
            .update_item(
                "TUserStageRanking",
                &key,
                vec![UpdateAction::Add("score".into(), 5)],
            )
            .await
            .unwrap();
        assert_eq!(item["score"], Value::from(5i64));
        assert_eq!(item["uid"], Value::from(9));

        let err = store
            .update_item(
                "TUserStageRanking",
                &key,
                vec![UpdateAction::Set("uid".into(), Value::from(10))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_batch_get_rejects_duplicates() {
        let store = seeded().await;
        let key = Key::composite("uid", 1, "stg_id", 1i64);
        let input = BatchGetInput {
            index: None,
            keys: vec![key.clone(), key],
        };
        let err = store.batch_get("TUserStageRanking", input).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_batch_get_skips_missing() {
        let store = seeded().await;
        let input = BatchGetInput {
            index: None,
            keys: vec![
                Key::composite("uid", 1, "stg_id", 1i64),
                Key::composite("uid", 7, "stg_id", 1i64),
            ],
        };
        let items = store.batch_get("TUserStageRanking", input).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_write_limits() {
        let store = MemoryStore::with_tables([ranking_spec()]);
        let puts: Vec<Item> = (0..26).map(|i| ranking(i, 1, "p", i)).collect();
        let input = BatchWriteInput {
            puts,
            deletes: Vec::new(),
        };
        assert!(store.batch_write("TUserStageRanking", input).await.is_err());

        let input = BatchWriteInput {
            puts: vec![ranking(1, 1, "p", 1)],
            deletes: vec![Key::composite("uid", 1, "stg_id", 1i64)],
        };
        assert!(store.batch_write("TUserStageRanking", input).await.is_err());
    }

    #[tokio::test]
    async fn test_batch_write_applies_puts_and_deletes() {
        let store = seeded().await;
        let input = BatchWriteInput {
            puts: vec![ranking(3, 1, "p", 1)],
            deletes: vec![Key::composite("uid", 2, "stg_id", 1i64)],
        };
        let out = store.batch_write("TUserStageRanking", input).await.unwrap();
        assert_eq!(out.written, 2);
        let all = store
            .scan("TUserStageRanking", ScanInput::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
    }
}
