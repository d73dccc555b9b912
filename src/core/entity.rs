//! Document trait implemented by every stored resource model

use crate::core::error::{ApiResult, StorageError};
use crate::core::query::SortSpec;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// A resource model persisted as a JSON document.
///
/// Implementors describe where they live (`resource_name`, the collection
/// and URL segment) and how listings are ordered when no `sort` parameter is
/// given. Conversion to and from the store's JSON representation goes
/// through serde, and every write is checked with [`Validate`].
pub trait Document: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// The plural resource name, also the collection name (e.g. "bootcamps")
    fn resource_name() -> &'static str;

    /// The singular resource name used in messages (e.g. "bootcamp")
    fn resource_name_singular() -> &'static str;

    /// Ordering applied to listings without a `sort` parameter
    fn default_sort() -> SortSpec {
        SortSpec::ascending("name")
    }

    /// Fields that an update may never change
    fn immutable_fields() -> &'static [&'static str] {
        &["id", "createdAt"]
    }

    /// Recompute derived fields before the document is written
    fn before_save(&mut self) {}

    /// Get the unique identifier for this document
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Serialize into the store representation
    fn to_document(&self) -> ApiResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            StorageError::CorruptDocument {
                collection: Self::resource_name().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Deserialize a document read back from the store
    fn from_document(document: Value) -> ApiResult<Self> {
        serde_json::from_value(document).map_err(|e| {
            StorageError::CorruptDocument {
                collection: Self::resource_name().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}
