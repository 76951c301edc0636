// Resume generation: upload → generate → download.
// All backend traffic goes through `ResumeBackend`; no retries anywhere.

pub mod download;
pub mod workflow;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::api_client::ResumeBackend;
use crate::errors::ClientError;
use crate::models::resume::{DownloadFormat, GeneratedResume};

use self::workflow::GenerationWorkflow;

#[derive(Clone)]
pub struct ResumeService {
    backend: Arc<dyn ResumeBackend>,
}

impl ResumeService {
    pub fn new(backend: Arc<dyn ResumeBackend>) -> Self {
        Self { backend }
    }

    /// A fresh builder flow in the `Idle` state.
    pub fn workflow(&self) -> GenerationWorkflow {
        GenerationWorkflow::new(self.backend.clone())
    }

    /// Fetches the artifact and saves it under `destination`.
    pub async fn download(
        &self,
        resume_id: i64,
        format: DownloadFormat,
        destination: &Path,
    ) -> Result<PathBuf, ClientError> {
        let bytes = self.backend.download_resume(resume_id, format).await?;
        let target = download::resolve_target(destination, resume_id, format);
        let saved = download::save_artifact(&bytes, &target)?;
        info!(
            "Saved resume {resume_id} as {} ({} bytes)",
            saved.display(),
            bytes.len()
        );
        Ok(saved)
    }

    /// Previously generated resumes, oldest first as the backend returns them.
    pub async fn history(&self) -> Result<Vec<GeneratedResume>, ClientError> {
        self.backend.list_resumes().await
    }
}
