// Profile CRUD, section editing and the completeness score.
// All backend traffic goes through `ResumeBackend`.

pub mod completeness;
pub mod editor;
pub mod keyed;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::api_client::{ResumeBackend, ResumeUpload};
use crate::errors::ClientError;
use crate::models::profile::{ProfileData, UserProfile};

/// Thin CRUD wrapper over the profile resource.
#[derive(Clone)]
pub struct ProfileService {
    backend: Arc<dyn ResumeBackend>,
}

impl ProfileService {
    pub fn new(backend: Arc<dyn ResumeBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, ClientError> {
        self.backend.list_profiles().await
    }

    /// Uploads a resume file; the backend parses it into a new profile.
    pub async fn upload(
        &self,
        path: &Path,
        profile_name: Option<String>,
    ) -> Result<UserProfile, ClientError> {
        let upload = read_upload(path, profile_name).await?;
        let profile = self.backend.create_profile(upload).await?;
        info!("Created profile {} from {}", profile.id, path.display());
        Ok(profile)
    }

    /// Replaces the whole document of a saved profile.
    pub async fn update(&self, id: i64, data: &ProfileData) -> Result<UserProfile, ClientError> {
        self.backend.update_profile(id, data).await
    }
}

/// Reads a resume from disk into an upload payload.
pub async fn read_upload(
    path: &Path,
    profile_name: Option<String>,
) -> Result<ResumeUpload, ClientError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(ResumeUpload {
        file_name,
        bytes,
        profile_name,
    })
}
