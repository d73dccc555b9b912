//! Photo upload policy
//!
//! A photo arrives as the multipart field `file`. It must be an image, may not
//! exceed the configured size and is stored as `photo_<id><ext>` inside the
//! upload directory. Size is checked while the field is streamed, so an
//! oversized or non-image file never reaches the disk.

use crate::config::UploadConfig;
use crate::core::error::{ApiError, ApiResult, UploadError};
use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// A file read from a multipart request, not yet written
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload limits and destination
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: u64,
    directory: PathBuf,
}

impl UploadPolicy {
    pub fn new(max_bytes: u64, directory: impl Into<PathBuf>) -> Self {
        Self {
            max_bytes,
            directory: directory.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_upload, config.file_upload_path.clone())
    }

    /// Reject anything whose MIME type is not `image/*`
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<(), UploadError> {
        match content_type {
            Some(mime) if mime.starts_with("image") => Ok(()),
            other => Err(UploadError::NotAnImage {
                mime_type: other.unwrap_or_default().to_string(),
            }),
        }
    }

    /// Reject sizes above the limit
    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_bytes {
            Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }

    /// Read the `file` field of a multipart body
    ///
    /// Other fields are skipped. The MIME type is checked before the body is
    /// read and the size after every chunk.
    pub async fn read(&self, multipart: &mut Multipart) -> ApiResult<UploadedFile> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| self.stream_error(e))?
        {
            if field.name() == Some(FILE_FIELD) {
                return self.read_field(field).await;
            }
        }
        Err(UploadError::MissingFile.into())
    }

    async fn read_field(&self, mut field: Field<'_>) -> ApiResult<UploadedFile> {
        let content_type = field.content_type().map(str::to_string);
        self.check_content_type(content_type.as_deref())?;
        let file_name = field.file_name().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| self.stream_error(e))? {
            self.check_size((bytes.len() + chunk.len()) as u64)?;
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() && file_name.is_none() {
            return Err(UploadError::MissingFile.into());
        }

        Ok(UploadedFile {
            file_name,
            content_type: content_type.unwrap_or_default(),
            bytes,
        })
    }

    /// A body cut off by a length limit is reported as an oversized image
    fn stream_error(&self, err: MultipartError) -> ApiError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge {
                max_bytes: self.max_bytes,
            }
            .into()
        } else {
            err.into()
        }
    }

    /// Write a file into the upload directory, returning its full path
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        let path = self.directory.join(file_name);
        let write_failed = |e: std::io::Error| {
            tracing::error!(path = %path.display(), error = %e, "failed to store upload");
            UploadError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        };

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(write_failed)?;
        tokio::fs::write(&path, bytes).await.map_err(write_failed)?;

        tracing::info!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(path)
    }
}

/// Deterministic photo name: `photo_<id>` plus the original extension
pub fn photo_file_name(id: &Uuid, original: Option<&str>) -> String {
    match original
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("photo_{}.{}", id, ext),
        None => format!("photo_{}", id),
    }
}
