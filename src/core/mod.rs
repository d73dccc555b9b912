//! Core module: the list-query pipeline, the store seam and shared HTTP plumbing

pub mod entity;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod query;
pub mod repository;
pub mod response;
pub mod store;
pub mod upload;

pub use entity::Document;
pub use error::{ApiError, ApiResult};
pub use extractors::{ApiJson, ListParams, ResourceId};
pub use filter::{Condition, Filter, FilterOp};
pub use query::{ListQuery, PageWindow, Pagination, Projection, QueryMap, QueryValue, SortSpec};
pub use repository::{ListResult, Repository};
pub use response::{ApiResponse, ListResponse};
pub use store::{AverageAggregation, DocumentStore, FindQuery, GroupAverage, Populate};
pub use upload::{UploadPolicy, UploadedFile, photo_file_name};
