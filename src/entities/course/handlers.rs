//! Course HTTP handlers

use super::model::{Course, CreateCourse};
use super::service::CourseService;
use crate::core::error::ApiResult;
use crate::core::extractors::{ApiJson, ListParams, ResourceId};
use crate::core::response::{ApiResponse, ListResponse};
use crate::entities::bootcamp::Bootcamp;
use axum::extract::State;
use serde_json::Value;

/// Course-specific AppState
#[derive(Clone)]
pub struct CourseAppState {
    pub service: CourseService,
}

/// `GET /api/v1/courses`
pub async fn list_courses(
    State(state): State<CourseAppState>,
    ListParams(params): ListParams,
) -> ApiResult<ListResponse> {
    Ok(state.service.list(&params).await?.into())
}

/// `GET /api/v1/bootcamps/{id}/courses`
pub async fn list_bootcamp_courses(
    State(state): State<CourseAppState>,
    bootcamp_id: ResourceId,
    ListParams(params): ListParams,
) -> ApiResult<ListResponse> {
    let bootcamp_id = bootcamp_id.parse::<Bootcamp>()?;
    Ok(state
        .service
        .list_for_bootcamp(&bootcamp_id, &params)
        .await?
        .into())
}

/// `GET /api/v1/courses/{id}`
pub async fn get_course(
    State(state): State<CourseAppState>,
    id: ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    let course = state.service.get(&id.parse::<Course>()?).await?;
    Ok(ApiResponse::ok(course))
}

/// `POST /api/v1/bootcamps/{id}/courses`
pub async fn create_course(
    State(state): State<CourseAppState>,
    bootcamp_id: ResourceId,
    ApiJson(payload): ApiJson<CreateCourse>,
) -> ApiResult<ApiResponse<Course>> {
    let course = state
        .service
        .create(&bootcamp_id.parse::<Bootcamp>()?, payload)
        .await?;
    Ok(ApiResponse::created(course))
}

/// `PUT /api/v1/courses/{id}`
pub async fn update_course(
    State(state): State<CourseAppState>,
    id: ResourceId,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<ApiResponse<Course>> {
    let course = state.service.update(&id.parse::<Course>()?, patch).await?;
    Ok(ApiResponse::ok(course))
}

/// `DELETE /api/v1/courses/{id}`
pub async fn delete_course(
    State(state): State<CourseAppState>,
    id: ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    state.service.delete(&id.parse::<Course>()?).await?;
    Ok(ApiResponse::empty())
}
