use std::sync::Arc;

use crate::api_client::{ApiClient, ResumeBackend};
use crate::auth::state::AuthState;
use crate::auth::token_store::TokenStore;
use crate::auth::AuthService;
use crate::config::Config;
use crate::errors::ClientError;
use crate::generation::ResumeService;
use crate::profile::ProfileService;

/// Shared client state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub auth: Arc<AuthState>,
    /// The same client as `api`, behind the trait the services depend on.
    pub backend: Arc<dyn ResumeBackend>,
}

impl AppState {
    pub fn build(config: Config) -> Result<Self, ClientError> {
        let tokens = TokenStore::new(config.token_path.clone());
        let api = ApiClient::new(config.api_url.clone(), tokens.clone())?;
        Ok(Self {
            backend: Arc::new(api.clone()),
            api,
            auth: Arc::new(AuthState::new(tokens)),
            config,
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.backend.clone(), self.auth.clone())
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.backend.clone())
    }

    pub fn resumes(&self) -> ResumeService {
        ResumeService::new(self.backend.clone())
    }
}
