//! In-memory `ResumeBackend` used by unit tests across modules.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use crate::api_client::{
    AuthResponse, GenerateParams, ResumeBackend, ResumeUpload, DEFAULT_PROFILE_NAME,
};
use crate::errors::ClientError;
use crate::models::profile::{ProfileData, ProfileId, UserProfile};
use crate::models::resume::{DownloadFormat, GeneratedResume};

/// An `Api` error as the backend would send it, with a string `detail`.
pub fn api_error(status: u16, detail: &str) -> ClientError {
    ClientError::from_response(status, &serde_json::json!({ "detail": detail }).to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    Register(String),
    ListProfiles,
    CreateProfile(String),
    UpdateProfile(i64),
    Generate(GenerateParams),
    Download(i64, DownloadFormat),
    ListResumes,
}

pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    profiles: Mutex<Vec<UserProfile>>,
    resumes: Mutex<Vec<GeneratedResume>>,
    next_id: AtomicI64,
    pub fail_upload: AtomicBool,
    pub fail_generate: AtomicBool,
    pub fail_update: AtomicBool,
    pub register_detail: Mutex<Option<String>>,
    /// When set, the next `update_profile` parks until the gate is notified.
    pub update_gate: Mutex<Option<Arc<Notify>>>,
    pub update_entered: Notify,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            profiles: Mutex::new(Vec::new()),
            resumes: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(101),
            fail_upload: AtomicBool::new(false),
            fail_generate: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            register_detail: Mutex::new(None),
            update_gate: Mutex::new(None),
            update_entered: Notify::new(),
        }
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles.lock().unwrap().push(profile);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_profile(&self, id: i64) -> Option<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == ProfileId::Saved(id))
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error(detail: &str) -> ClientError {
        api_error(500, detail)
    }
}

#[async_trait]
impl ResumeBackend for FakeBackend {
    async fn login(&self, username: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        self.record(Call::Login(username.to_string()));
        if username == "wrong@example.com" {
            return Err(api_error(401, "Incorrect username or password"));
        }
        Ok(AuthResponse {
            access_token: Some(format!("token-for-{username}")),
            token_type: Some("bearer".to_string()),
        })
    }

    async fn register(&self, email: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        self.record(Call::Register(email.to_string()));
        let detail = self.register_detail.lock().unwrap().clone();
        if let Some(detail) = detail {
            return Err(api_error(422, &detail));
        }
        Ok(AuthResponse {
            access_token: Some(format!("token-for-{email}")),
            token_type: Some("bearer".to_string()),
        })
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, ClientError> {
        self.record(Call::ListProfiles);
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn create_profile(&self, upload: ResumeUpload) -> Result<UserProfile, ClientError> {
        self.record(Call::CreateProfile(upload.file_name.clone()));
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(Self::server_error("Failed to generate profile"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let profile = UserProfile {
            id: ProfileId::Saved(id),
            name: upload
                .profile_name
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            profile_data: ProfileData {
                about: format!("Parsed from {}", upload.file_name),
                ..Default::default()
            },
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: i64,
        data: &ProfileData,
    ) -> Result<UserProfile, ClientError> {
        self.record(Call::UpdateProfile(id));
        let gate = self.update_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.update_entered.notify_one();
            gate.notified().await;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::server_error("database unavailable"));
        }

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == ProfileId::Saved(id))
            .ok_or_else(|| api_error(404, "Profile not found"))?;
        profile.profile_data = data.clone();
        Ok(profile.clone())
    }

    async fn generate_resume(
        &self,
        params: &GenerateParams,
    ) -> Result<GeneratedResume, ClientError> {
        self.record(Call::Generate(params.clone()));
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(Self::server_error("agent returned no output"));
        }
        let resume = GeneratedResume {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: params.generation_name.clone(),
            job_description: Some(params.job_description.clone()),
            template_id: Some(i64::from(params.template_id)),
            created_at: None,
            tailored_resume_content: None,
        };
        self.resumes.lock().unwrap().push(resume.clone());
        Ok(resume)
    }

    async fn download_resume(
        &self,
        id: i64,
        format: DownloadFormat,
    ) -> Result<Bytes, ClientError> {
        self.record(Call::Download(id, format));
        Ok(Bytes::from(format!("{}-artifact-{id}", format.as_str())))
    }

    async fn list_resumes(&self) -> Result<Vec<GeneratedResume>, ClientError> {
        self.record(Call::ListResumes);
        Ok(self.resumes.lock().unwrap().clone())
    }
}
