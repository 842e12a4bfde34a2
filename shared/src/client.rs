//! Auth DTOs shared between the API client and anything that fakes the backend
//!
//! The backend issues a bearer token on login and echoes the user's role so
//! the client can build its session without a second round trip.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Role,
}

/// Register request (admin only on the backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Backend defaults to cashier when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
