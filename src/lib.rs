//! # DevCamper
//!
//! REST backend for a bootcamp directory: bootcamps, their courses, photo
//! uploads and a generic list-query pipeline.
//!
//! ## Features
//!
//! - **List queries**: filtering (`averageCost[lte]=10000`, `careers=Web&careers=UI`),
//!   projection (`select=name,description`), sorting (`sort=-averageCost,name`)
//!   and pagination (`page`, `limit`) with `next`/`prev` links
//! - **Pluggable storage**: every backend implements [`core::store::DocumentStore`];
//!   an in-memory store is built in and MongoDB is available behind `mongodb_backend`
//! - **Typed errors**: one `{ "success": false, "error": ... }` envelope for every failure
//! - **Average cost**: a bootcamp's `averageCost` follows its courses' tuition
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use devcamper::prelude::*;
//!
//! let config = AppConfig::load()?;
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_store(InMemoryDocumentStore::new())
//!     .with_default_entities()
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod observability;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Document,
        error::{ApiError, ApiResult},
        extractors::{ApiJson, ListParams, ResourceId},
        filter::{Condition, Filter, FilterOp},
        query::{ListQuery, PageWindow, Pagination, Projection, QueryMap, SortSpec},
        repository::{ListResult, Repository},
        response::{ApiResponse, ListResponse},
        store::{AverageAggregation, DocumentStore, FindQuery, GroupAverage, Populate},
        upload::UploadPolicy,
    };

    // === Entities ===
    pub use crate::entities::{
        Bootcamp, BootcampDescriptor, BootcampService, Course, CourseDescriptor, CourseService,
    };

    // === Storage ===
    pub use crate::storage::InMemoryDocumentStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDocumentStore;

    // === Config ===
    pub use crate::config::{AppConfig, CountScope, ListingConfig, UploadConfig};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
