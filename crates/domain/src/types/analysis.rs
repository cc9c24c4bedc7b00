//! Job-application analysis models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::files::FileUpload;

/// Lifecycle of an analysis job (and of each of its steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl ProcessingStatus {
    /// `true` once the job will not change any more.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Cover letter tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Conversational,
    Confident,
    Enthusiastic,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Conversational => "conversational",
            Self::Confident => "confident",
            Self::Enthusiastic => "enthusiastic",
        }
    }
}

/// Input for `POST /api/v1/analyze-application`, sent as a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub job_url: Option<String>,
    pub company_name: Option<String>,
    pub resume_text: Option<String>,
    pub resume_file: Option<FileUpload>,
    pub tone: Tone,
    pub focus_areas: Vec<String>,
    pub include_salary_guidance: bool,
    pub include_interview_prep: bool,
}

impl AnalysisRequest {
    pub fn new(job_description: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            job_url: None,
            company_name: None,
            resume_text: None,
            resume_file: None,
            tone: Tone::default(),
            focus_areas: vec!["technical skills".into(), "relevant experience".into()],
            include_salary_guidance: false,
            include_interview_prep: false,
        }
    }

    pub fn with_resume_text(mut self, text: impl Into<String>) -> Self {
        self.resume_text = Some(text.into());
        self
    }

    pub fn with_resume_file(mut self, file: FileUpload) -> Self {
        self.resume_file = Some(file);
        self
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn with_job_url(mut self, url: impl Into<String>) -> Self {
        self.job_url = Some(url.into());
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Focus areas as the comma-separated form field the service expects.
    pub fn focus_areas_field(&self) -> String {
        self.focus_areas
            .iter()
            .map(|area| area.trim())
            .filter(|area| !area.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Reply to a successful analysis submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStarted {
    /// Identifier used by the progress/results/cancel endpoints.
    pub session_id: String,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub progress: Map<String, Value>,
    #[serde(default)]
    pub estimated_completion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStep {
    pub step_number: u32,
    pub step_name: String,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub analysis_id: String,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub overall_progress: u8,
    #[serde(default)]
    pub current_step: Option<ProgressStep>,
    #[serde(default)]
    pub steps: Vec<ProgressStep>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Completed analysis. Section payloads are produced server-side by the
/// language model and kept as loosely-typed JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub analysis_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub job_analysis: Value,
    #[serde(default)]
    pub company_research: Value,
    #[serde(default)]
    pub parsed_resume: Value,
    #[serde(default)]
    pub skills_analysis: Value,
    #[serde(default)]
    pub resume_recommendations: Value,
    #[serde(default)]
    pub cover_letter: Value,
    #[serde(default)]
    pub final_summary: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analysis_id: String,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub overall_progress: u8,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub job_description_preview: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistory {
    #[serde(default)]
    pub analyses: Vec<AnalysisSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_areas_are_joined_and_trimmed() {
        let mut request = AnalysisRequest::new("x");
        request.focus_areas = vec![" leadership ".into(), String::new(), "rust".into()];
        assert_eq!(request.focus_areas_field(), "leadership,rust");
    }

    #[test]
    fn progress_tolerates_naive_timestamps() {
        let progress: AnalysisProgress = serde_json::from_str(
            r#"{
                "analysis_id": "a1",
                "status": "processing",
                "overall_progress": 28,
                "current_step": {
                    "step": "company_research",
                    "step_number": 2,
                    "step_name": "Company Research",
                    "status": "processing",
                    "progress_percentage": 40,
                    "started_at": "2024-05-01T10:00:00.123456",
                    "details": {}
                },
                "steps": [],
                "started_at": "2024-05-01T09:59:58",
                "updated_at": "2024-05-01T10:00:01",
                "error": null
            }"#,
        )
        .unwrap();

        assert_eq!(progress.status, ProcessingStatus::Processing);
        assert_eq!(progress.current_step.unwrap().step_number, 2);
        assert!(!progress.status.is_terminal());
    }
}
