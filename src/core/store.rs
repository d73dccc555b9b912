//! Document store abstraction
//!
//! The API never talks to a database directly. Every backend implements
//! [`DocumentStore`], a small collection-oriented interface over JSON
//! documents, modeled on what a MongoDB-style driver offers: filtered find
//! with projection/sort/skip/limit, count, by-id operations and a
//! match → group → average aggregation.
//!
//! Documents carry their identifier in the `id` field as a UUID string.

use crate::core::filter::Filter;
use crate::core::query::{Projection, SortSpec};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Eager resolution of related documents (a join performed with the fetch)
///
/// For each fetched document, related documents whose `foreign_field`
/// equals the document's `local_field` are attached under `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Populate {
    /// Field the related documents are attached to
    pub path: String,
    /// Collection the related documents are read from
    pub from: String,
    /// Field on the fetched document holding the join value
    pub local_field: String,
    /// Field on the related documents compared with `local_field`
    pub foreign_field: String,
    /// Attach an array (`true`) or the first match / `null` (`false`)
    pub many: bool,
    /// Optional projection applied to related documents
    pub select: Option<Projection>,
}

impl Populate {
    /// Attach every document of `from` that references this one
    ///
    /// `Populate::children("courses", "courses", "bootcamp")` lists a
    /// bootcamp's courses under `courses`.
    pub fn children(path: &str, from: &str, foreign_field: &str) -> Self {
        Self {
            path: path.to_string(),
            from: from.to_string(),
            local_field: crate::core::query::ID_FIELD.to_string(),
            foreign_field: foreign_field.to_string(),
            many: true,
            select: None,
        }
    }

    /// Replace a reference field with the referenced document
    ///
    /// `Populate::parent("bootcamp", "bootcamps")` swaps a course's bootcamp id
    /// for the bootcamp itself.
    pub fn parent(path: &str, from: &str) -> Self {
        Self {
            path: path.to_string(),
            from: from.to_string(),
            local_field: path.to_string(),
            foreign_field: crate::core::query::ID_FIELD.to_string(),
            many: false,
            select: None,
        }
    }

    /// Restrict the fields of the attached documents
    pub fn select(mut self, projection: Projection) -> Self {
        self.select = Some(projection);
        self
    }
}

/// Options of a single find operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub projection: Option<Projection>,
    pub sort: Option<SortSpec>,
    pub skip: usize,
    pub limit: Option<usize>,
    pub populate: Vec<Populate>,
}

impl FindQuery {
    /// Find every document matching `filter`
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Match → group → average aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct AverageAggregation {
    /// Documents entering the pipeline
    pub match_filter: Filter,
    /// Field the documents are grouped by
    pub group_by: String,
    /// Numeric field averaged within each group
    pub average_of: String,
}

/// One group produced by an [`AverageAggregation`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    /// Value of the `group_by` field shared by the group
    pub key: Value,
    /// Mean of the averaged field over the group
    pub average: f64,
}

/// Storage backend for JSON documents grouped in named collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// Find documents (filter, then sort, skip, limit, projection, populate)
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>>;

    /// Count documents matching a filter
    async fn count(&self, collection: &str, filter: &Filter) -> Result<usize>;

    /// Fetch a document by identifier
    async fn find_by_id(&self, collection: &str, id: &Uuid) -> Result<Option<Value>>;

    /// Insert a document; its `id` field must already be set
    async fn insert(&self, collection: &str, document: Value) -> Result<Value>;

    /// Set top-level fields of a document, returning the updated document
    ///
    /// Returns `Ok(None)` when no document has this identifier.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>>;

    /// Delete a document by identifier, returning whether it existed
    async fn delete_by_id(&self, collection: &str, id: &Uuid) -> Result<bool>;

    /// Delete every document matching a filter, returning how many were removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<usize>;

    /// Run a match → group → average aggregation
    async fn aggregate_average(
        &self,
        collection: &str,
        aggregation: &AverageAggregation,
    ) -> Result<Vec<GroupAverage>>;
}
