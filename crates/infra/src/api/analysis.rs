//! Job-application analysis operations

use careercraft_domain::constants::MIN_JOB_DESCRIPTION_CHARS;
use careercraft_domain::{
    AnalysisHistory, AnalysisProgress, AnalysisRequest, AnalysisResults, AnalysisStarted,
    StatusMessage,
};
use tracing::{info, instrument};

use super::client::{segment, ApiClient};
use super::errors::ApiError;
use super::files::validate_upload;
use crate::http::{ApiRequest, MultipartField, RequestBody};

const ANALYZE: &str = "/api/v1/analyze-application";
const HISTORY: &str = "/api/v1/analysis/history";

/// Check a submission against the rules the service enforces.
///
/// # Errors
///
/// Returns a description of the first rule the request breaks.
pub fn validate_analysis(request: &AnalysisRequest, max_file_size: u64) -> Result<(), String> {
    let description_chars = request.job_description.trim().chars().count();
    if description_chars < MIN_JOB_DESCRIPTION_CHARS {
        return Err(format!(
            "job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters, got {description_chars}"
        ));
    }

    let has_text = request.resume_text.as_deref().is_some_and(|text| !text.trim().is_empty());
    match &request.resume_file {
        Some(file) => validate_upload(file, max_file_size),
        None if has_text => Ok(()),
        None => Err("either resume text or a resume file is required".to_string()),
    }
}

/// Multipart fields in the shape `POST /api/v1/analyze-application` reads.
fn form_fields(request: &AnalysisRequest) -> Vec<MultipartField> {
    let mut fields = vec![MultipartField::text("job_description", request.job_description.as_str())];

    let optional = [
        ("job_url", &request.job_url),
        ("company_name", &request.company_name),
        ("resume_text", &request.resume_text),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            fields.push(MultipartField::text(name, value));
        }
    }
    if let Some(file) = &request.resume_file {
        fields.push(MultipartField::file("resume_file", file));
    }

    fields.push(MultipartField::text("tone", request.tone.as_str()));
    fields.push(MultipartField::text("focus_areas", request.focus_areas_field()));
    fields.push(MultipartField::text(
        "include_salary_guidance",
        request.include_salary_guidance.to_string(),
    ));
    fields.push(MultipartField::text(
        "include_interview_prep",
        request.include_interview_prep.to_string(),
    ));
    fields
}

impl ApiClient {
    /// Submit a job description and resume for analysis.
    ///
    /// # Errors
    ///
    /// Rejected locally when the request breaks the submission rules;
    /// otherwise the classified failure.
    #[instrument(skip(self, request), fields(has_file = request.resume_file.is_some()))]
    pub async fn start_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisStarted, ApiError> {
        validate_analysis(request, self.max_file_size()).map_err(|message| self.reject(message))?;

        let body = RequestBody::Multipart(form_fields(request));
        let started: AnalysisStarted = self.call(ApiRequest::post(ANALYZE).body(body)).await?;

        info!(session_id = %started.session_id, status = ?started.status, "analysis started");
        Ok(started)
    }

    #[instrument(skip(self))]
    pub async fn poll_analysis(&self, analysis_id: &str) -> Result<AnalysisProgress, ApiError> {
        let path = format!("/api/v1/analysis/{}/progress", segment(analysis_id));
        self.call(ApiRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn analysis_results(&self, analysis_id: &str) -> Result<AnalysisResults, ApiError> {
        let path = format!("/api/v1/analysis/{}/results", segment(analysis_id));
        self.call(ApiRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_analysis(&self, analysis_id: &str) -> Result<StatusMessage, ApiError> {
        let path = format!("/api/v1/analysis/{}/cancel", segment(analysis_id));
        self.call(ApiRequest::post(path)).await
    }

    #[instrument(skip(self))]
    pub async fn analysis_history(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<AnalysisHistory, ApiError> {
        self.call(ApiRequest::get(HISTORY).query("limit", limit).query("offset", offset)).await
    }
}

#[cfg(test)]
mod tests {
    use careercraft_domain::{FileUpload, Tone};

    use super::*;

    fn description() -> String {
        "Senior Rust engineer to build resilient API clients and services. ".repeat(2)
    }

    #[test]
    fn requires_long_enough_description() {
        let request = AnalysisRequest::new("too short").with_resume_text("resume");
        assert!(validate_analysis(&request, 1024).unwrap_err().contains("at least 50"));
    }

    #[test]
    fn requires_some_resume() {
        let request = AnalysisRequest::new(description());
        assert!(validate_analysis(&request, 1024).unwrap_err().contains("resume"));

        let blank = AnalysisRequest::new(description()).with_resume_text("   ");
        assert!(validate_analysis(&blank, 1024).is_err());
    }

    #[test]
    fn attached_file_is_validated() {
        let request = AnalysisRequest::new(description())
            .with_resume_file(FileUpload::new("resume.png", vec![1, 2, 3]));
        assert!(validate_analysis(&request, 1024).unwrap_err().contains("unsupported"));
    }

    #[test]
    fn form_contains_only_present_optionals() {
        let request = AnalysisRequest::new(description())
            .with_resume_text("Ten years of Rust")
            .with_company("Acme")
            .with_tone(Tone::Confident);

        let names: Vec<String> = form_fields(&request)
            .into_iter()
            .map(|field| match field {
                MultipartField::Text { name, .. } | MultipartField::File { name, .. } => name,
            })
            .collect();

        assert_eq!(
            names,
            vec![
                "job_description",
                "company_name",
                "resume_text",
                "tone",
                "focus_areas",
                "include_salary_guidance",
                "include_interview_prep",
            ]
        );
        assert!(form_fields(&request)
            .contains(&MultipartField::text("tone", "confident")));
    }
}
