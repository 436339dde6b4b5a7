// file: src/models/auth.rs
// description: login request and token response bodies
// reference: POST /auth/login

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub tenant_id: String,
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(tenant_id: &str, email: &str, password: &str) -> Self {
        Self {
            tenant_id: tenant_id.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("tenant_id", &self.tenant_id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}
