//! File operations
//!
//! Uploads are validated locally (non-empty, size limit, extension) before
//! any network I/O; a rejected file never reaches the server.

use careercraft_domain::constants::ALLOWED_UPLOAD_EXTENSIONS;
use careercraft_domain::{
    ExtractedText, FileInfo, FileUpload, FileUploadResponse, StatusMessage, SupportedFormats,
};
use tracing::{info, instrument};

use super::client::{segment, ApiClient};
use super::errors::ApiError;
use crate::http::{ApiRequest, MultipartField, RequestBody};

const UPLOAD: &str = "/api/v1/files/upload";
const SUPPORTED_FORMATS: &str = "/api/v1/files/supported-formats";

/// Check an upload against the client-side limits.
///
/// # Errors
///
/// Returns a description of the first rule the file breaks.
pub fn validate_upload(upload: &FileUpload, max_size: u64) -> Result<(), String> {
    if upload.is_empty() {
        return Err(format!("file '{}' is empty", upload.file_name));
    }
    if upload.len() > max_size {
        return Err(format!(
            "file '{}' is {} bytes, exceeding the {} byte limit",
            upload.file_name,
            upload.len(),
            max_size
        ));
    }
    match upload.extension() {
        Some(ext) if ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(format!(
            "file '{}' has an unsupported type; allowed: {}",
            upload.file_name,
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        )),
    }
}

impl ApiClient {
    /// Upload a resume file as multipart form data.
    ///
    /// # Errors
    ///
    /// Rejected locally (validation, no status) when the file breaks the
    /// upload rules; otherwise the classified failure.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.len()))]
    pub async fn upload_file(&self, upload: &FileUpload) -> Result<FileUploadResponse, ApiError> {
        validate_upload(upload, self.max_file_size()).map_err(|message| self.reject(message))?;

        let body = RequestBody::Multipart(vec![
            MultipartField::file("file", upload),
            MultipartField::text("extract_immediately", upload.extract_immediately.to_string()),
        ]);
        let response: FileUploadResponse = self.call(ApiRequest::post(UPLOAD).body(body)).await?;

        info!(file_id = %response.file_id, status = ?response.processing_status, "file uploaded");
        Ok(response)
    }

    /// Fetch the text extracted from an uploaded file.
    #[instrument(skip(self))]
    pub async fn download_file_text(&self, file_id: &str) -> Result<ExtractedText, ApiError> {
        self.call(ApiRequest::get(format!("/api/v1/files/extract/{}", segment(file_id)))).await
    }

    #[instrument(skip(self))]
    pub async fn file_info(&self, file_id: &str) -> Result<FileInfo, ApiError> {
        self.call(ApiRequest::get(format!("/api/v1/files/info/{}", segment(file_id)))).await
    }

    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: &str) -> Result<StatusMessage, ApiError> {
        self.call(ApiRequest::delete(format!("/api/v1/files/cleanup/{}", segment(file_id)))).await
    }

    #[instrument(skip(self))]
    pub async fn supported_formats(&self) -> Result<SupportedFormats, ApiError> {
        self.call(ApiRequest::get(SUPPORTED_FORMATS)).await
    }
}
