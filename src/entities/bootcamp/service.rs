//! Bootcamp operations: listing, CRUD, cascade delete and photo upload

use super::model::{Bootcamp, CreateBootcamp};
use crate::config::ListingConfig;
use crate::core::entity::Document;
use crate::core::error::ApiResult;
use crate::core::filter::Filter;
use crate::core::query::{ListQuery, QueryMap};
use crate::core::repository::{ListResult, Repository};
use crate::core::store::{DocumentStore, Populate};
use crate::core::upload::{UploadPolicy, photo_file_name};
use crate::entities::course::Course;
use axum::extract::Multipart;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct BootcampService {
    bootcamps: Repository<Bootcamp>,
    courses: Repository<Course>,
    listing: ListingConfig,
    upload: UploadPolicy,
}

impl BootcampService {
    pub fn new(store: Arc<dyn DocumentStore>, listing: ListingConfig, upload: UploadPolicy) -> Self {
        Self {
            bootcamps: Repository::new(store.clone()),
            courses: Repository::new(store),
            listing,
            upload,
        }
    }

    /// Paginated listing with each bootcamp's courses attached
    pub async fn list(&self, params: &QueryMap) -> ApiResult<ListResult> {
        let query = ListQuery::from_query_map(params, &self.listing, Bootcamp::default_sort())
            .with_populate(Populate::children(
                Course::resource_name(),
                Course::resource_name(),
                "bootcamp",
            ));
        self.bootcamps.list(&query).await
    }

    pub async fn get(&self, id: &Uuid) -> ApiResult<Bootcamp> {
        self.bootcamps.get(id).await
    }

    pub async fn create(&self, payload: CreateBootcamp) -> ApiResult<Bootcamp> {
        payload.validate()?;
        self.bootcamps.create(payload.into_bootcamp()).await
    }

    pub async fn update(&self, id: &Uuid, patch: Value) -> ApiResult<Bootcamp> {
        let existing = self.bootcamps.get(id).await?;
        self.bootcamps.update(&existing, patch).await
    }

    /// Delete a bootcamp and every course that belongs to it
    pub async fn remove_with_cascade(&self, id: &Uuid) -> ApiResult<()> {
        let bootcamp = self.bootcamps.get(id).await?;

        let removed = self
            .courses
            .delete_where(&Filter::eq("bootcamp", bootcamp.id.to_string()))
            .await?;
        tracing::info!(bootcamp = %bootcamp.id, courses = removed, "removing bootcamp courses");

        self.bootcamps.delete(&bootcamp.id).await
    }

    /// Store an uploaded photo and point the bootcamp at it
    ///
    /// Returns the stored file name.
    pub async fn upload_photo(&self, id: &Uuid, multipart: &mut Multipart) -> ApiResult<String> {
        let bootcamp = self.bootcamps.get(id).await?;

        let file = self.upload.read(multipart).await?;
        let file_name = photo_file_name(&bootcamp.id, file.file_name.as_deref());
        self.upload.store(&file_name, &file.bytes).await?;

        let mut changes = Map::new();
        changes.insert("photo".to_string(), Value::String(file_name.clone()));
        self.bootcamps.set_fields(&bootcamp.id, changes).await?;

        Ok(file_name)
    }
}
