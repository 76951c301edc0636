//! The builder flow: upload a resume, generate a tailored version against a
//! job description, hand back a handle for download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::{error, info, warn};

use crate::api_client::{GenerateParams, ResumeBackend};
use crate::errors::ClientError;
use crate::models::profile::ProfileId;
use crate::models::resume::{GeneratedResume, ResumeLength, TemplateId};
use crate::profile::ProfileService;

pub const MISSING_FILE: &str = "Please upload a resume first.";
pub const EMPTY_JOB_DESCRIPTION: &str = "Please enter a job description.";
pub const GENERATION_FAILED: &str = "Failed to generate resume. Please try again.";
pub const DISMISS_FIRST: &str = "Dismiss the previous error before generating again.";

/// Extensions the upload form advertises. Other files are still sent.
const SUGGESTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStatus {
    Idle,
    Loading,
    Success(GeneratedResume),
    Error(String),
}

/// A resume chosen for upload. Only the path is held; the bytes are read
/// when the workflow actually uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    path: PathBuf,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_mb(&self) -> Option<f64> {
        std::fs::metadata(&self.path)
            .ok()
            .map(|m| m.len() as f64 / 1024.0 / 1024.0)
    }

    /// UI hints only; nothing here blocks an upload.
    pub fn advisories(&self) -> Vec<String> {
        let extension = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if SUGGESTED_EXTENSIONS.contains(&extension.as_str()) {
            Vec::new()
        } else {
            vec![format!(
                "{} is not a .pdf or .docx file; the backend may not parse it",
                self.path.display()
            )]
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub file: Option<SelectedFile>,
    pub job_description: String,
    pub template: TemplateId,
    pub length: ResumeLength,
    /// Forwarded to the backend exactly as given.
    pub ats_feedback: Option<String>,
    pub profile_name: Option<String>,
}

impl GenerationRequest {
    /// Local checks run before any network call.
    pub fn validate(&self) -> Result<&SelectedFile, ClientError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| ClientError::Validation(MISSING_FILE.to_string()))?;
        if self.job_description.trim().is_empty() {
            return Err(ClientError::Validation(EMPTY_JOB_DESCRIPTION.to_string()));
        }
        Ok(file)
    }
}

/// `Idle → Loading → Success | Error`. `Error` only returns to `Idle` through
/// `dismiss`; a new run from `Idle` or `Success` starts over at `Loading`.
/// `run` takes `&mut self`, so a workflow can never have two runs in flight.
pub struct GenerationWorkflow {
    backend: Arc<dyn ResumeBackend>,
    profiles: ProfileService,
    status: GenerationStatus,
}

impl GenerationWorkflow {
    pub fn new(backend: Arc<dyn ResumeBackend>) -> Self {
        Self {
            profiles: ProfileService::new(backend.clone()),
            backend,
            status: GenerationStatus::Idle,
        }
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn dismiss(&mut self) {
        if !matches!(self.status, GenerationStatus::Loading) {
            self.status = GenerationStatus::Idle;
        }
    }

    pub async fn run(&mut self, request: &GenerationRequest) -> Result<GeneratedResume, ClientError> {
        if matches!(self.status, GenerationStatus::Error(_)) {
            return Err(ClientError::Validation(DISMISS_FIRST.to_string()));
        }

        let file = match request.validate() {
            Ok(file) => file,
            Err(e) => {
                self.status = GenerationStatus::Error(e.to_string());
                return Err(e);
            }
        };
        for advisory in file.advisories() {
            warn!("{advisory}");
        }

        self.status = GenerationStatus::Loading;
        info!(
            "Generating resume with {} ({})",
            request.template.display_name(),
            request.length
        );

        match self.upload_and_generate(file, request).await {
            Ok(resume) => {
                info!("Generated resume {} ({})", resume.id, resume.name);
                self.status = GenerationStatus::Success(resume.clone());
                Ok(resume)
            }
            Err(e) => {
                error!("Resume generation failed: {e}");
                self.status = GenerationStatus::Error(GENERATION_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Upload strictly precedes generation. A profile created here is not
    /// rolled back if generation fails.
    async fn upload_and_generate(
        &self,
        file: &SelectedFile,
        request: &GenerationRequest,
    ) -> Result<GeneratedResume, ClientError> {
        let profile = self
            .profiles
            .upload(file.path(), request.profile_name.clone())
            .await?;
        let ProfileId::Saved(profile_id) = profile.id else {
            return Err(ClientError::Internal(anyhow::anyhow!(
                "backend returned a profile without an id"
            )));
        };

        let params = GenerateParams {
            profile_id,
            job_description: request.job_description.clone(),
            template_id: request.template.id(),
            ats_feedback: request.ats_feedback.clone(),
            resume_length: request.length.as_str().to_string(),
            generation_name: generation_name(),
        };
        self.backend.generate_resume(&params).await
    }
}

fn generation_name() -> String {
    format!("Resume for {}", Local::now().format("%-m/%-d/%Y"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::test_support::{Call, FakeBackend};

    fn resume_file(dir: &tempfile::TempDir) -> SelectedFile {
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.4 fake resume").unwrap();
        SelectedFile::new(path)
    }

    fn request(file: Option<SelectedFile>, jd: &str) -> GenerationRequest {
        GenerationRequest {
            file,
            job_description: jd.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_job_description_fails_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let mut workflow = GenerationWorkflow::new(backend.clone());
        assert_eq!(workflow.status(), &GenerationStatus::Idle);

        let err = workflow
            .run(&request(Some(resume_file(&dir)), "   "))
            .await
            .unwrap_err();

        assert!(err.is_local());
        assert_eq!(
            workflow.status(),
            &GenerationStatus::Error(EMPTY_JOB_DESCRIPTION.to_string())
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_network() {
        let backend = Arc::new(FakeBackend::new());
        let mut workflow = GenerationWorkflow::new(backend.clone());

        workflow
            .run(&request(None, "Senior Backend Engineer"))
            .await
            .unwrap_err();

        assert_eq!(
            workflow.status(),
            &GenerationStatus::Error(MISSING_FILE.to_string())
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_then_generate_with_returned_id() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let mut workflow = GenerationWorkflow::new(backend.clone());

        let mut req = request(Some(resume_file(&dir)), "Senior Backend Engineer");
        req.template = TemplateId::try_from(1).unwrap();
        let resume = workflow.run(&req).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::CreateProfile("resume.pdf".to_string()));
        let Call::Generate(params) = &calls[1] else {
            panic!("expected generate call, got {:?}", calls[1]);
        };
        assert_eq!(params.profile_id, 101);
        assert_eq!(params.job_description, "Senior Backend Engineer");
        assert_eq!(params.template_id, 1);
        assert_eq!(params.resume_length, "1 page");
        assert!(params.ats_feedback.is_none());
        assert!(params.generation_name.starts_with("Resume for "));

        assert_eq!(workflow.status(), &GenerationStatus::Success(resume));
    }

    #[tokio::test]
    async fn test_ats_feedback_passed_through_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let mut workflow = GenerationWorkflow::new(backend.clone());

        let mut req = request(Some(resume_file(&dir)), "Data Engineer");
        req.ats_feedback = Some("  Missing keyword: Spark \n".to_string());
        req.length = ResumeLength::TwoPages;
        workflow.run(&req).await.unwrap();

        let Some(Call::Generate(params)) = backend.calls().pop() else {
            panic!("expected generate call");
        };
        assert_eq!(
            params.ats_feedback.as_deref(),
            Some("  Missing keyword: Spark \n")
        );
        assert_eq!(params.resume_length, "2 pages");
    }

    #[tokio::test]
    async fn test_backend_failure_is_generic_and_needs_dismissal() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        backend.fail_generate.store(true, Ordering::SeqCst);
        let mut workflow = GenerationWorkflow::new(backend.clone());
        let req = request(Some(resume_file(&dir)), "SRE");

        workflow.run(&req).await.unwrap_err();
        assert_eq!(
            workflow.status(),
            &GenerationStatus::Error(GENERATION_FAILED.to_string())
        );
        // the uploaded profile stays; nothing is retried
        assert_eq!(backend.calls().len(), 2);
        assert!(backend.stored_profile(101).is_some());

        // error is sticky until dismissed
        let err = workflow.run(&req).await.unwrap_err();
        assert_eq!(err.to_string(), DISMISS_FIRST);
        assert_eq!(backend.calls().len(), 2);

        workflow.dismiss();
        assert_eq!(workflow.status(), &GenerationStatus::Idle);

        backend.fail_generate.store(false, Ordering::SeqCst);
        workflow.run(&req).await.unwrap();
        assert!(matches!(workflow.status(), GenerationStatus::Success(_)));
    }

    #[tokio::test]
    async fn test_upload_failure_skips_generation() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        backend.fail_upload.store(true, Ordering::SeqCst);
        let mut workflow = GenerationWorkflow::new(backend.clone());

        workflow
            .run(&request(Some(resume_file(&dir)), "SRE"))
            .await
            .unwrap_err();
        assert_eq!(
            backend.calls(),
            vec![Call::CreateProfile("resume.pdf".to_string())]
        );
    }

    #[tokio::test]
    async fn test_success_allows_new_run() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let mut workflow = GenerationWorkflow::new(backend.clone());
        let req = request(Some(resume_file(&dir)), "SRE");

        let first = workflow.run(&req).await.unwrap();
        let second = workflow.run(&req).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(backend.calls().len(), 4);
    }

    #[test]
    fn test_advisories_for_unexpected_extension() {
        assert!(SelectedFile::new("cv.pdf").advisories().is_empty());
        assert!(SelectedFile::new("CV.DOCX").advisories().is_empty());
        assert_eq!(SelectedFile::new("cv.txt").advisories().len(), 1);
    }
}
