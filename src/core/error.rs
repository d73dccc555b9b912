//! Typed error handling for the devcamper API
//!
//! Every handler returns [`ApiResult`]. Failures are forwarded with `?` to a
//! single [`IntoResponse`] implementation which maps the error kind to an HTTP
//! status and renders the `{ "success": false, "error": ... }` envelope.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups by identifier that matched nothing
//! - [`ValidationError`]: malformed or policy-violating request input
//! - [`UploadError`]: photo upload policy and write failures
//! - [`StorageError`]: failures coming from the document store
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_bootcamp(id: Uuid) -> ApiResult<Bootcamp> {
//!     repo.get(&id).await?.ok_or_else(|| EntityError::not_found("bootcamp", id).into())
//! }
//! ```

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Message returned to clients for any server-side failure.
const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// The main error type for the API
#[derive(Debug)]
pub enum ApiError {
    /// Identifier-based lookups that found nothing
    Entity(EntityError),

    /// Bad request input
    Validation(ValidationError),

    /// Photo upload errors
    Upload(UploadError),

    /// Document store errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Upload(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Upload(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error body sent to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Entity(e) => e.error_code(),
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Upload(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is the server's fault
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to clients
    ///
    /// Server errors are reduced to a generic message; the full error is logged.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Upload(e) => e.to_string(),
            _ if self.is_server_error() => SERVER_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.public_message(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                code = self.error_code(),
                error = %self,
                details = ?self,
                "request failed"
            );
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to identifier-based lookups
#[derive(Debug)]
pub enum EntityError {
    /// No document matched the identifier
    NotFound { entity_type: String, id: String },
}

impl EntityError {
    /// Build a not-found error for any displayable identifier
    pub fn not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "RESOURCE_NOT_FOUND",
        }
    }
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { id, .. } => {
                write!(f, "Resource not found with id of {}", id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input
#[derive(Debug)]
pub enum ValidationError {
    /// One or more field-level violations
    FieldErrors(Vec<FieldValidationError>),

    /// Body could not be parsed as JSON for the target type
    InvalidJson { message: String },

    /// Request body was malformed in some other way
    InvalidBody { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Shorthand for a single field violation
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::FieldErrors(vec![FieldValidationError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                write!(f, "{}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors raised while accepting a photo upload
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The request carried no file
    #[error("Please upload a file")]
    MissingFile,

    /// The file's MIME type is not an image
    #[error("Uploaded file is not an image")]
    NotAnImage { mime_type: String },

    /// The file exceeds the configured maximum size
    #[error("Please upload an image less than {max_bytes}")]
    TooLarge { max_bytes: u64 },

    /// Writing the file to the upload directory failed
    #[error("Problem with file upload")]
    WriteFailed { path: String, message: String },
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFile => StatusCode::BAD_REQUEST,
            UploadError::NotAnImage { .. } => StatusCode::BAD_REQUEST,
            UploadError::TooLarge { .. } => StatusCode::BAD_REQUEST,
            UploadError::WriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::MissingFile => "UPLOAD_MISSING_FILE",
            UploadError::NotAnImage { .. } => "UPLOAD_NOT_AN_IMAGE",
            UploadError::TooLarge { .. } => "UPLOAD_TOO_LARGE",
            UploadError::WriteFailed { .. } => "UPLOAD_WRITE_FAILED",
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Upload(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the document store
#[derive(Debug)]
pub enum StorageError {
    /// A store operation failed
    QueryError { message: String },

    /// A stored document could not be decoded into its model
    CorruptDocument { collection: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { message } => {
                write!(f, "Store query error: {}", message)
            }
            StorageError::CorruptDocument {
                collection,
                message,
            } => {
                write!(f, "Corrupt document in '{}': {}", collection, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: rejection.body_text(),
        })
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(ValidationError::InvalidBody {
            message: err.body_text(),
        })
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for '{}' ({})", field, e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(ValidationError::FieldErrors(fields))
    }
}

/// Store backends report failures through `anyhow`
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage(StorageError::QueryError {
            message: format!("{:#}", err),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
