//! In-memory document store for development and tests

use crate::core::filter::{Filter, lookup};
use crate::core::query::ID_FIELD;
use crate::core::store::{AverageAggregation, DocumentStore, FindQuery, GroupAverage, Populate};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type Collection = IndexMap<Uuid, Value>;

/// In-memory document store
///
/// Collections are kept in insertion order, so a find without a sort returns
/// documents in the order they were created. Uses RwLock for thread-safe
/// access; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Collection>>> {
        self.collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Collection>>> {
        self.collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

fn document_id(document: &Value) -> Result<Uuid> {
    let raw = document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("document has no '{}' field", ID_FIELD))?;
    Uuid::parse_str(raw).map_err(|e| anyhow!("invalid document id '{}': {}", raw, e))
}

/// Attach related documents to `target` as described by `populate`
fn attach(
    collections: &HashMap<String, Collection>,
    target: &mut Value,
    source: &Value,
    populate: &Populate,
) {
    let key = lookup(source, &populate.local_field).cloned();
    let related: Vec<Value> = match (key, collections.get(&populate.from)) {
        (Some(key), Some(collection)) if !key.is_null() => collection
            .values()
            .filter(|doc| lookup(doc, &populate.foreign_field) == Some(&key))
            .map(|doc| match &populate.select {
                Some(projection) => projection.apply(doc),
                None => doc.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let value = if populate.many {
        Value::Array(related)
    } else {
        related.into_iter().next().unwrap_or(Value::Null)
    };

    if let Value::Object(map) = target {
        map.insert(populate.path.clone(), value);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>> {
        let collections = self.read()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = documents
            .values()
            .filter(|doc| query.filter.matches(doc))
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let page = matched
            .into_iter()
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX));

        let mut results = Vec::new();
        for document in page {
            let mut shaped = match &query.projection {
                Some(projection) => projection.apply(document),
                None => document.clone(),
            };
            for populate in &query.populate {
                attach(&collections, &mut shaped, document, populate);
            }
            results.push(shaped);
        }

        Ok(results)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0))
    }

    async fn find_by_id(&self, collection: &str, id: &Uuid) -> Result<Option<Value>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<Value> {
        let id = document_id(&document)?;
        let mut collections = self.write()?;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.contains_key(&id) {
            bail!("duplicate id '{}' in collection '{}'", id, collection);
        }
        documents.insert(id, document.clone());

        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let mut collections = self.write()?;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(None);
        };

        let Value::Object(fields) = document else {
            bail!("document '{}' in '{}' is not an object", id, collection);
        };
        for (key, value) in changes {
            if key != ID_FIELD {
                fields.insert(key, value);
            }
        }

        Ok(Some(document.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: &Uuid) -> Result<bool> {
        let mut collections = self.write()?;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .is_some())
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|_, doc| !filter.matches(doc));
        Ok(before - documents.len())
    }

    async fn aggregate_average(
        &self,
        collection: &str,
        aggregation: &AverageAggregation,
    ) -> Result<Vec<GroupAverage>> {
        let collections = self.read()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        // group key (serialized) -> (key, sum, count)
        let mut groups: IndexMap<String, (Value, f64, usize)> = IndexMap::new();
        for document in documents
            .values()
            .filter(|doc| aggregation.match_filter.matches(doc))
        {
            let key = lookup(document, &aggregation.group_by)
                .cloned()
                .unwrap_or(Value::Null);
            let Some(amount) = lookup(document, &aggregation.average_of).and_then(Value::as_f64)
            else {
                continue;
            };
            let entry = groups
                .entry(key.to_string())
                .or_insert_with(|| (key, 0.0, 0));
            entry.1 += amount;
            entry.2 += 1;
        }

        Ok(groups
            .into_values()
            .map(|(key, sum, count)| GroupAverage {
                key,
                average: sum / count as f64,
            })
            .collect())
    }
}
