//! Success envelopes
//!
//! Every successful response is `{ "success": true, "data": ... }`; listings
//! add `count` (documents on the page) and `pagination`.

use crate::core::query::Pagination;
use crate::core::repository::ListResult;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

/// Single-resource envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::OK,
        }
    }

    /// 201 Created with `data`
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<Value> {
    /// 200 OK with an empty object (used by deletes)
    pub fn empty() -> Self {
        Self::ok(json!({}))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Listing envelope
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

impl From<ListResult> for ListResponse {
    fn from(result: ListResult) -> Self {
        Self {
            success: true,
            count: result.documents.len(),
            pagination: result.pagination,
            data: result.documents,
        }
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
