//! Request bodies
//!
//! Multipart forms are not `Clone` in reqwest, so bodies are kept as plain
//! data and turned into a fresh reqwest body on every attempt.

use careercraft_domain::{CareerCraftError, FileUpload, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Serialize;

/// One multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, file_name: String, content_type: Option<String>, bytes: Vec<u8> },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text { name: name.into(), value: value.into() }
    }

    pub fn file(name: impl Into<String>, upload: &FileUpload) -> Self {
        Self::File {
            name: name.into(),
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            bytes: upload.bytes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON, signed and sent byte-for-byte.
    Json(String),
    Multipart(Vec<MultipartField>),
    Binary(Vec<u8>),
}

impl RequestBody {
    /// Serialize `value` once; the same text is signed and transmitted.
    ///
    /// # Errors
    /// Returns `CareerCraftError::Serialization` if `value` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_string(value)
            .map(Self::Json)
            .map_err(|e| CareerCraftError::Serialization(format!("failed to encode body: {e}")))
    }

    /// Body segment of the signature input.
    pub fn signing_segment(&self) -> &str {
        match self {
            Self::Json(text) => text,
            Self::Empty | Self::Multipart(_) | Self::Binary(_) => "",
        }
    }

    /// Attach to a request. Only JSON sets a content type; reqwest adds the
    /// multipart boundary itself.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> reqwest::Result<RequestBuilder> {
        Ok(match self {
            Self::Empty => builder,
            Self::Json(text) => builder.header(CONTENT_TYPE, "application/json").body(text.clone()),
            Self::Binary(bytes) => builder.body(bytes.clone()),
            Self::Multipart(fields) => builder.multipart(build_form(fields)?),
        })
    }
}

fn build_form(fields: &[MultipartField]) -> reqwest::Result<Form> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File { name, file_name, content_type, bytes } => {
                let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(content_type) = content_type {
                    part = part.mime_str(content_type)?;
                }
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_serialized_compactly_and_signed_verbatim() {
        let body = RequestBody::json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(body, RequestBody::Json(r#"{"a":1}"#.into()));
        assert_eq!(body.signing_segment(), r#"{"a":1}"#);
    }

    #[test]
    fn multipart_and_binary_sign_the_empty_string() {
        let upload = FileUpload::new("resume.pdf", b"%PDF-1.7".to_vec());
        let multipart = RequestBody::Multipart(vec![
            MultipartField::file("file", &upload),
            MultipartField::text("extract_immediately", "true"),
        ]);
        assert_eq!(multipart.signing_segment(), "");
        assert_eq!(RequestBody::Binary(vec![1, 2, 3]).signing_segment(), "");
        assert_eq!(RequestBody::Empty.signing_segment(), "");
    }

    #[test]
    fn json_content_type_only_for_json() {
        let client = reqwest::Client::new();

        let json = RequestBody::Json("{}".into())
            .apply(client.post("http://localhost/x"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(json.headers()[CONTENT_TYPE], "application/json");

        let binary = RequestBody::Binary(vec![0])
            .apply(client.post("http://localhost/x"))
            .unwrap()
            .build()
            .unwrap();
        assert!(binary.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn invalid_part_mime_is_rejected() {
        let upload = FileUpload::new("a.txt", b"x".to_vec()).with_content_type("not a mime");
        let body = RequestBody::Multipart(vec![MultipartField::file("file", &upload)]);
        assert!(body.apply(reqwest::Client::new().post("http://localhost/x")).is_err());
    }
}
