//! Sign-in, sign-up and sign-out. The backend issues a bearer token; the
//! client only stores it. Presence of the token is the whole auth model.

pub mod routes;
pub mod state;
pub mod token_store;

use std::sync::Arc;

use tracing::info;

use crate::api_client::{AuthResponse, ResumeBackend};
use crate::errors::ClientError;

use self::routes::Route;
use self::state::AuthState;

pub const LOGIN_FAILED: &str = "Invalid email or password";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

pub struct AuthService {
    backend: Arc<dyn ResumeBackend>,
    state: Arc<AuthState>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn ResumeBackend>, state: Arc<AuthState>) -> Self {
        Self { backend, state }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Exchanges credentials for a token. Lands on the builder.
    pub async fn login(&self, username: &str, password: &str) -> Result<Route, ClientError> {
        let response = self.backend.login(username, password).await?;
        self.store_token(&response)?;
        info!("Signed in as {username}");
        Ok(self.state.navigate(Route::Builder))
    }

    /// Creates an account. The confirmation check happens before any request.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Route, ClientError> {
        if password != confirm_password {
            return Err(ClientError::Validation("Passwords do not match".to_string()));
        }
        let response = self.backend.register(email, password).await?;
        self.store_token(&response)?;
        info!("Registered {email}");
        Ok(self.state.navigate(Route::Builder))
    }

    pub fn logout(&self) -> Result<Route, ClientError> {
        self.state.store().clear()?;
        self.state.refresh();
        info!("Signed out");
        Ok(Route::Home)
    }

    fn store_token(&self, response: &AuthResponse) -> Result<(), ClientError> {
        if let Some(token) = response.access_token.as_deref() {
            self.state.store().save(token)?;
        }
        self.state.refresh();
        Ok(())
    }
}

/// What a failed registration shows: the backend's unpacked detail when there
/// is one, otherwise a generic line. Raw response bodies are never shown.
pub fn register_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Api {
            detail: Some(detail),
            ..
        } if !detail.is_empty() => detail.clone(),
        other => other.user_message(REGISTER_FAILED),
    }
}
