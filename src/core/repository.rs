//! Typed repository over a [`DocumentStore`]
//!
//! `Repository<T>` turns the JSON-level store into typed CRUD for one
//! [`Document`] model and runs the listing pipeline: total count, then a
//! single filtered/projected/sorted/windowed fetch, then pagination links.

use crate::core::entity::Document;
use crate::core::error::{ApiResult, EntityError, ValidationError};
use crate::core::filter::Filter;
use crate::core::query::{ListQuery, Pagination};
use crate::core::store::{AverageAggregation, DocumentStore, FindQuery, GroupAverage, Populate};
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    /// Documents of the page, shaped by projection and populate
    pub documents: Vec<Value>,
    /// Size of the counted set (see `CountScope`)
    pub total: usize,
    pub pagination: Pagination,
}

/// Typed access to the collection of `T`
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Name of the backing collection
    pub fn collection(&self) -> &'static str {
        T::resource_name()
    }

    /// Run the listing pipeline
    ///
    /// Issues one count and one find against the store.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<ListResult> {
        let total = self
            .store
            .count(self.collection(), &query.count_filter())
            .await?;

        let find = FindQuery {
            filter: query.filter.clone(),
            projection: query.projection.clone(),
            sort: Some(query.sort.clone()),
            skip: query.window.start_index(),
            limit: Some(query.window.limit),
            populate: query.populate.clone(),
        };
        let documents = self.store.find(self.collection(), &find).await?;

        tracing::debug!(
            collection = self.collection(),
            total,
            returned = documents.len(),
            "listed documents"
        );

        Ok(ListResult {
            documents,
            total,
            pagination: Pagination::new(query.window, total),
        })
    }

    /// Fetch a document or fail with Not-Found
    pub async fn get(&self, id: &Uuid) -> ApiResult<T> {
        match self.store.find_by_id(self.collection(), id).await? {
            Some(document) => T::from_document(document),
            None => Err(EntityError::not_found(T::resource_name_singular(), id).into()),
        }
    }

    /// Fetch a document with related documents attached
    pub async fn get_populated(&self, id: &Uuid, populate: &[Populate]) -> ApiResult<Value> {
        let query = FindQuery {
            filter: Filter::eq(crate::core::query::ID_FIELD, id.to_string()),
            limit: Some(1),
            populate: populate.to_vec(),
            ..FindQuery::default()
        };
        self.store
            .find(self.collection(), &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EntityError::not_found(T::resource_name_singular(), id).into())
    }

    /// Validate and insert a new document
    pub async fn create(&self, mut document: T) -> ApiResult<T> {
        document.before_save();
        document.validate()?;

        let stored = self
            .store
            .insert(self.collection(), document.to_document()?)
            .await?;

        tracing::info!(
            collection = self.collection(),
            id = %document.id(),
            "created document"
        );
        T::from_document(stored)
    }

    /// Merge a JSON patch into an existing document, validate and write it
    ///
    /// Top-level fields of `patch` replace the stored ones; immutable fields
    /// and unknown fields are ignored.
    pub async fn update(&self, existing: &T, patch: Value) -> ApiResult<T> {
        let Value::Object(patch) = patch else {
            return Err(ValidationError::InvalidBody {
                message: "Request body must be a JSON object".to_string(),
            }
            .into());
        };

        let mut merged = match existing.to_document()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if !T::immutable_fields().contains(&key.as_str()) {
                merged.insert(key, value);
            }
        }

        let mut updated: T = serde_json::from_value(Value::Object(merged))?;
        updated.before_save();
        updated.validate()?;

        let mut changes = match updated.to_document()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        // Fields owned by other writers keep their stored value
        changes.retain(|key, _| !T::immutable_fields().contains(&key.as_str()));
        self.write_changes(&existing.id(), changes).await
    }

    /// Set individual fields without re-validating the whole document
    pub async fn set_fields(&self, id: &Uuid, changes: Map<String, Value>) -> ApiResult<T> {
        self.write_changes(id, changes).await
    }

    async fn write_changes(&self, id: &Uuid, changes: Map<String, Value>) -> ApiResult<T> {
        match self
            .store
            .update_by_id(self.collection(), id, changes)
            .await?
        {
            Some(document) => {
                tracing::debug!(collection = self.collection(), id = %id, "updated document");
                T::from_document(document)
            }
            None => Err(EntityError::not_found(T::resource_name_singular(), id).into()),
        }
    }

    /// Delete a document or fail with Not-Found
    pub async fn delete(&self, id: &Uuid) -> ApiResult<()> {
        if self.store.delete_by_id(self.collection(), id).await? {
            tracing::info!(collection = self.collection(), id = %id, "deleted document");
            Ok(())
        } else {
            Err(EntityError::not_found(T::resource_name_singular(), id).into())
        }
    }

    /// Delete every document matching a filter
    pub async fn delete_where(&self, filter: &Filter) -> ApiResult<usize> {
        Ok(self.store.delete_many(self.collection(), filter).await?)
    }

    /// Run a match → group → average aggregation over the collection
    pub async fn average(&self, aggregation: &AverageAggregation) -> ApiResult<Vec<GroupAverage>> {
        Ok(self
            .store
            .aggregate_average(self.collection(), aggregation)
            .await?)
    }
}
