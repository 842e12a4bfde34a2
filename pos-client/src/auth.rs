//! Auth API - login, logout and staff registration
//!
//! Login is the only place a [`Session`] is created; logout is purely local
//! because the backend keeps no server-side session.

use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::Role;
use shared::response::MessageResponse;

use crate::{ClientResult, NetworkHttpClient, Session, SessionStore};

#[derive(Debug, Clone)]
pub struct AuthApi {
    http: NetworkHttpClient,
}

impl AuthApi {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }

    fn store(&self) -> &SessionStore {
        self.http.session()
    }

    /// Login with username and password, replacing any existing session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.http.post_public("/login", &request).await?;

        let session = Session::new(username, resp.access_token, resp.role);
        self.store().set(session.clone());
        tracing::info!(username = %username, role = %resp.role, "Staff member logged in");
        Ok(session)
    }

    /// Clear the session
    pub fn logout(&self) -> Option<Session> {
        let session = self.store().clear();
        if let Some(s) = &session {
            tracing::info!(username = %s.username, "Staff member logged out");
        }
        session
    }

    /// Register a new staff member (requires an admin session on the backend)
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> ClientResult<String> {
        let request = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        let resp: MessageResponse = self.http.post("/register", &request).await?;
        Ok(resp.message)
    }
}
