//! File upload models

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analysis::ProcessingStatus;

/// A file held in memory, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// Ask the service to extract text as part of the upload.
    pub extract_immediately: bool,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), content_type: None, bytes, extract_immediately: true }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn extract_immediately(mut self, extract: bool) -> Self {
        self.extract_immediately = extract;
        self
    }

    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// File contents stay out of logs.
impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .field("extract_immediately", &self.extract_immediately)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub file_id: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub upload_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub file_id: String,
    pub file_info: FileInfo,
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub message: String,
}

/// Text extracted from an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub file_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedFormats {
    #[serde(default)]
    pub supported_formats: Vec<String>,
    #[serde(default)]
    pub max_file_size_mb: Option<f64>,
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}
