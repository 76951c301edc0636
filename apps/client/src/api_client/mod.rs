/// API client: the single point of entry for every backend call made by Tailor.
///
/// No other module builds HTTP requests. Services depend on the
/// `ResumeBackend` trait so they can be exercised against an in-memory fake.
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::token_store::TokenStore;
use crate::errors::ClientError;
use crate::models::profile::{ProfileData, UserProfile};
use crate::models::resume::{DownloadFormat, GeneratedResume};

/// Profile name sent with an upload when the caller does not pick one.
pub const DEFAULT_PROFILE_NAME: &str = "Default Profile";

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

/// A resume file read into memory, ready for the multipart upload.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub profile_name: Option<String>,
}

/// Query parameters of `POST /resume/generate-resume`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateParams {
    pub profile_id: i64,
    pub job_description: String,
    pub template_id: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_feedback: Option<String>,
    pub resume_length: String,
    pub generation_name: String,
}

/// Everything the client needs from the backend.
///
/// `ApiClient` is the production implementation.
#[async_trait]
pub trait ResumeBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError>;

    async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, ClientError>;

    async fn create_profile(&self, upload: ResumeUpload) -> Result<UserProfile, ClientError>;

    async fn update_profile(&self, id: i64, data: &ProfileData)
        -> Result<UserProfile, ClientError>;

    async fn generate_resume(&self, params: &GenerateParams)
        -> Result<GeneratedResume, ClientError>;

    async fn download_resume(&self, id: i64, format: DownloadFormat)
        -> Result<Bytes, ClientError>;

    async fn list_resumes(&self) -> Result<Vec<GeneratedResume>, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the stored bearer token, if any. A token that cannot be read
    /// is treated as absent; the backend then answers 401.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!("Could not read stored token: {e}");
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned {}: {}", status, body);
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// `GET /health`, served at the host root rather than under the API prefix.
    pub async fn health(&self) -> Result<Value, ClientError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Internal(anyhow::anyhow!("invalid base URL: {e}")))?;
        let url = base
            .join("/health")
            .map_err(|e| ClientError::Internal(anyhow::anyhow!("invalid health URL: {e}")))?;
        debug!("GET {url}");
        self.send_json(self.client.get(url)).await
    }
}

#[async_trait]
impl ResumeBackend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        debug!("POST /auth/login");
        let form = [("username", username), ("password", password)];
        self.send_json(self.client.post(self.url("/auth/login")).form(&form))
            .await
    }

    async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        debug!("POST /auth/register");
        let form = [("email", email), ("password", password)];
        self.send_json(self.client.post(self.url("/auth/register")).form(&form))
            .await
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, ClientError> {
        debug!("GET /user-profile/");
        self.send_json(self.client.get(self.url("/user-profile/")))
            .await
    }

    async fn create_profile(&self, upload: ResumeUpload) -> Result<UserProfile, ClientError> {
        debug!(
            "POST /user-profile/ ({}, {} bytes)",
            upload.file_name,
            upload.bytes.len()
        );
        let part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = multipart::Form::new().part("resume", part).text(
            "profile_name",
            upload
                .profile_name
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
        );
        self.send_json(self.client.post(self.url("/user-profile/")).multipart(form))
            .await
    }

    async fn update_profile(
        &self,
        id: i64,
        data: &ProfileData,
    ) -> Result<UserProfile, ClientError> {
        debug!("PUT /user-profile/{id}");
        self.send_json(
            self.client
                .put(self.url(&format!("/user-profile/{id}")))
                .json(data),
        )
        .await
    }

    async fn generate_resume(
        &self,
        params: &GenerateParams,
    ) -> Result<GeneratedResume, ClientError> {
        debug!(
            "POST /resume/generate-resume (profile_id={}, template_id={})",
            params.profile_id, params.template_id
        );
        self.send_json(
            self.client
                .post(self.url("/resume/generate-resume"))
                .query(params),
        )
        .await
    }

    async fn download_resume(
        &self,
        id: i64,
        format: DownloadFormat,
    ) -> Result<Bytes, ClientError> {
        debug!("GET /resume/download/{id}?format={format}");
        let response = self
            .send(
                self.client
                    .get(self.url(&format!("/resume/download/{id}")))
                    .query(&[("format", format.as_str())]),
            )
            .await?;
        Ok(response.bytes().await?)
    }

    async fn list_resumes(&self) -> Result<Vec<GeneratedResume>, ClientError> {
        debug!("GET /resume/");
        self.send_json(self.client.get(self.url("/resume/"))).await
    }
}
