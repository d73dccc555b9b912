//! Bootcamp HTTP handlers

use super::model::{Bootcamp, CreateBootcamp};
use super::service::BootcampService;
use crate::core::error::{ApiResult, UploadError};
use crate::core::extractors::{ApiJson, ListParams, ResourceId};
use crate::core::response::{ApiResponse, ListResponse};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde_json::Value;

/// Bootcamp-specific AppState
#[derive(Clone)]
pub struct BootcampAppState {
    pub service: BootcampService,
}

/// `GET /api/v1/bootcamps`
pub async fn list_bootcamps(
    State(state): State<BootcampAppState>,
    ListParams(params): ListParams,
) -> ApiResult<ListResponse> {
    let result = state.service.list(&params).await?;
    Ok(result.into())
}

/// `GET /api/v1/bootcamps/{id}`
pub async fn get_bootcamp(
    State(state): State<BootcampAppState>,
    id: ResourceId,
) -> ApiResult<ApiResponse<Bootcamp>> {
    let bootcamp = state.service.get(&id.parse::<Bootcamp>()?).await?;
    Ok(ApiResponse::ok(bootcamp))
}

/// `POST /api/v1/bootcamps`
pub async fn create_bootcamp(
    State(state): State<BootcampAppState>,
    ApiJson(payload): ApiJson<CreateBootcamp>,
) -> ApiResult<ApiResponse<Bootcamp>> {
    let bootcamp = state.service.create(payload).await?;
    Ok(ApiResponse::created(bootcamp))
}

/// `PUT /api/v1/bootcamps/{id}`
pub async fn update_bootcamp(
    State(state): State<BootcampAppState>,
    id: ResourceId,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<ApiResponse<Bootcamp>> {
    let bootcamp = state
        .service
        .update(&id.parse::<Bootcamp>()?, patch)
        .await?;
    Ok(ApiResponse::ok(bootcamp))
}

/// `DELETE /api/v1/bootcamps/{id}`
pub async fn delete_bootcamp(
    State(state): State<BootcampAppState>,
    id: ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    state
        .service
        .remove_with_cascade(&id.parse::<Bootcamp>()?)
        .await?;
    Ok(ApiResponse::empty())
}

/// `PUT /api/v1/bootcamps/{id}/photo`
///
/// A request that is not `multipart/form-data` carries no file.
pub async fn upload_bootcamp_photo(
    State(state): State<BootcampAppState>,
    id: ResourceId,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<String>> {
    let id = id.parse::<Bootcamp>()?;
    let Ok(mut multipart) = multipart else {
        // The bootcamp must exist before the body matters
        state.service.get(&id).await?;
        return Err(UploadError::MissingFile.into());
    };

    let file_name = state.service.upload_photo(&id, &mut multipart).await?;
    Ok(ApiResponse::ok(file_name))
}
