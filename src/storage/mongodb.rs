//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! devcamper-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One MongoDB collection per resource collection ("bootcamps", "courses").
//! Documents are converted through `serde_json::Value`; UUIDs and dates are
//! stored as strings and the `id` field is mapped to MongoDB's `_id`.
//!
//! Finds run as an aggregation pipeline (`$match`, `$sort`, `$skip`,
//! `$limit`, one `$lookup` per populate, `$project`) so that related
//! documents are resolved in the same round trip. Pipeline `$lookup` with
//! `localField`/`foreignField` requires MongoDB 5.0 or later.

use crate::core::filter::{Condition, Filter, FilterOp};
use crate::core::query::{ID_FIELD, Projection, SortDirection, SortSpec};
use crate::core::store::{AverageAggregation, DocumentStore, FindQuery, GroupAverage, Populate};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};
use serde_json::{Map, Value};
use uuid::Uuid;

const MONGO_ID: &str = "_id";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove(ID_FIELD) {
        doc.insert(MONGO_ID, id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id`.
fn document_to_json(mut doc: Document) -> Value {
    if let Some(id) = doc.remove(MONGO_ID) {
        doc.insert(ID_FIELD, id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Map a document field path to its stored name
fn stored_field(field: &str) -> String {
    if field == ID_FIELD {
        MONGO_ID.to_string()
    } else {
        field.to_string()
    }
}

/// BSON values a raw query string may stand for
///
/// MongoDB stores native types, so `"25"` must match the string `"25"` as
/// well as the integer `25`.
fn bson_variants(value: &str) -> Vec<Bson> {
    let mut variants: Vec<Bson> = vec![Bson::String(value.to_string())];

    match value {
        "true" => variants.push(Bson::Boolean(true)),
        "false" => variants.push(Bson::Boolean(false)),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                variants.push(Bson::Int64(i));
                variants.push(Bson::Double(i as f64));
            } else if let Ok(f) = value.parse::<f64>() {
                variants.push(Bson::Double(f));
            }
        }
    }

    variants
}

/// Operand of a range comparison: numeric when the value parses as a number
fn bson_operand(value: &str) -> Bson {
    match value.trim().parse::<f64>() {
        Ok(f) => Bson::Double(f),
        Err(_) => Bson::String(value.to_string()),
    }
}

fn condition_document(condition: &Condition) -> Document {
    let field = stored_field(&condition.field);
    let variants = || -> Vec<Bson> {
        condition
            .values
            .iter()
            .flat_map(|v| bson_variants(v))
            .collect()
    };

    match condition.op {
        FilterOp::Eq | FilterOp::In => doc! { field: { "$in": variants() } },
        FilterOp::Ne => doc! { field: { "$nin": variants() } },
        FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
            let operand = condition
                .values
                .first()
                .map(|v| bson_operand(v))
                .unwrap_or(Bson::Null);
            doc! { field: { condition.op.mongo_operator(): operand } }
        }
    }
}

/// Translate a filter into a MongoDB query document
fn filter_document(filter: &Filter) -> Document {
    if filter.is_empty() {
        return doc! {};
    }
    let clauses: Vec<Bson> = filter
        .conditions()
        .iter()
        .map(|c| Bson::Document(condition_document(c)))
        .collect();
    doc! { "$and": clauses }
}

fn sort_document(sort: &SortSpec) -> Document {
    let mut document = Document::new();
    for key in sort.keys() {
        let direction = match key.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        document.insert(stored_field(&key.field), direction);
    }
    document
}

fn projection_document(projection: &Projection) -> Document {
    let mut document = doc! { MONGO_ID: 1 };
    for field in projection.fields() {
        if field != ID_FIELD {
            document.insert(field.clone(), 1);
        }
    }
    document
}

/// `$lookup` (and optional unwrap) stages for one populate
fn populate_stages(populate: &Populate) -> Vec<Document> {
    let inner: Vec<Document> = match &populate.select {
        Some(projection) => {
            let mut project = doc! { MONGO_ID: 0, ID_FIELD: "$_id" };
            for field in projection.fields() {
                if field != ID_FIELD {
                    project.insert(field.clone(), 1);
                }
            }
            vec![doc! { "$project": project }]
        }
        None => vec![
            doc! { "$set": { ID_FIELD: "$_id" } },
            doc! { "$unset": MONGO_ID },
        ],
    };

    let mut stages = vec![doc! {
        "$lookup": {
            "from": &populate.from,
            "localField": stored_field(&populate.local_field),
            "foreignField": stored_field(&populate.foreign_field),
            "pipeline": inner,
            "as": &populate.path,
        }
    }];

    if !populate.many {
        let path_ref = format!("${}", populate.path);
        stages.push(doc! {
            "$set": { &populate.path: { "$ifNull": [{ "$first": path_ref }, Bson::Null] } }
        });
    }

    stages
}

/// BSON integers are signed; counts beyond `i64::MAX` saturate
fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn find_pipeline(query: &FindQuery) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": filter_document(&query.filter) }];

    if let Some(sort) = &query.sort {
        pipeline.push(doc! { "$sort": sort_document(sort) });
    }
    if query.skip > 0 {
        pipeline.push(doc! { "$skip": to_i64(query.skip) });
    }
    if let Some(limit) = query.limit {
        pipeline.push(doc! { "$limit": to_i64(limit) });
    }
    for populate in &query.populate {
        pipeline.extend(populate_stages(populate));
    }
    if let Some(projection) = &query.projection {
        let mut project = projection_document(projection);
        for populate in &query.populate {
            project.insert(populate.path.clone(), 1);
        }
        pipeline.push(doc! { "$project": project });
    }

    pipeline
}

// ---------------------------------------------------------------------------
// MongoDocumentStore
// ---------------------------------------------------------------------------

/// Document store backed by a MongoDB database.
///
/// # Example
///
/// ```rust,ignore
/// use devcamper::storage::MongoDocumentStore;
///
/// let store = MongoDocumentStore::connect("mongodb://localhost:27017", "devcamper").await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Create a new `MongoDocumentStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to a MongoDB deployment and select a database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>> {
        let cursor = self
            .collection(collection)
            .aggregate(find_pipeline(query))
            .await
            .map_err(|e| anyhow!("Failed to query '{}': {}", collection, e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect documents: {}", e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let count = self
            .collection(collection)
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count '{}': {}", collection, e))?;
        Ok(count as usize)
    }

    async fn find_by_id(&self, collection: &str, id: &Uuid) -> Result<Option<Value>> {
        let doc = self
            .collection(collection)
            .find_one(doc! { MONGO_ID: uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get document: {}", e))?;

        Ok(doc.map(document_to_json))
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<Value> {
        let doc = json_to_document(document.clone())?;

        self.collection(collection)
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to insert into '{}': {}", collection, e))?;

        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &Uuid,
        mut changes: Map<String, Value>,
    ) -> Result<Option<Value>> {
        changes.remove(ID_FIELD);
        if changes.is_empty() {
            return self.find_by_id(collection, id).await;
        }

        let set = mongodb::bson::to_document(&changes)
            .map_err(|e| anyhow!("Failed to convert changes to BSON: {}", e))?;

        let updated = self
            .collection(collection)
            .find_one_and_update(doc! { MONGO_ID: uuid_bson(id) }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update document: {}", e))?;

        Ok(updated.map(document_to_json))
    }

    async fn delete_by_id(&self, collection: &str, id: &Uuid) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { MONGO_ID: uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete document: {}", e))?;

        Ok(result.deleted_count > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let result = self
            .collection(collection)
            .delete_many(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to delete from '{}': {}", collection, e))?;

        Ok(result.deleted_count as usize)
    }

    async fn aggregate_average(
        &self,
        collection: &str,
        aggregation: &AverageAggregation,
    ) -> Result<Vec<GroupAverage>> {
        let pipeline = vec![
            doc! { "$match": filter_document(&aggregation.match_filter) },
            doc! {
                "$group": {
                    MONGO_ID: format!("${}", stored_field(&aggregation.group_by)),
                    "average": { "$avg": format!("${}", aggregation.average_of) },
                }
            },
        ];

        let cursor = self
            .collection(collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| anyhow!("Failed to aggregate '{}': {}", collection, e))?;

        let groups: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect aggregation: {}", e))?;

        Ok(groups
            .into_iter()
            .filter_map(|group| {
                let average = group.get("average").and_then(Bson::as_f64)?;
                let key = group
                    .get(MONGO_ID)
                    .cloned()
                    .map(Bson::into_relaxed_extjson)
                    .unwrap_or(Value::Null);
                Some(GroupAverage { key, average })
            })
            .collect())
    }
}
