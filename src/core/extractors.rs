//! Axum extractors for resource handlers
//!
//! Every extractor rejects with [`ApiError`], so malformed requests produce
//! the same `{ "success": false, "error": ... }` envelope as handler failures.

use crate::core::entity::Document;
use crate::core::error::{ApiError, ApiResult, EntityError, ValidationError};
use crate::core::query::QueryMap;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use uuid::Uuid;

/// JSON body extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Raw `{id}` path segment
///
/// Kept as a string so that a malformed identifier can be reported as
/// Not-Found for the resource, like any unknown identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the identifier of a `T`, or fail with Not-Found
    pub fn parse<T: Document>(&self) -> ApiResult<Uuid> {
        Uuid::parse_str(self.0.trim())
            .map_err(|_| EntityError::not_found(T::resource_name_singular(), &self.0).into())
    }
}

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::InvalidBody {
                message: rejection.body_text(),
            })?;
        Ok(Self(raw))
    }
}

/// Query-string extractor for listings
///
/// Keeps repeated keys (`careers=Web&careers=UI`) as arrays.
#[derive(Debug, Clone, Default)]
pub struct ListParams(pub QueryMap);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::InvalidBody {
                message: rejection.body_text(),
            })?;
        Ok(Self(QueryMap::from_pairs(pairs)))
    }
}
