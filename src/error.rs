// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// The backend call an error belongs to. Its display form is the prefix of
/// every user-facing failure message ("Login failed: 401 ...").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAction {
    Login,
    Upload,
    Query,
    Health,
    ListTenants,
    CreateTenant,
    CreateUser,
}

impl fmt::Display for ApiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiAction::Login => "Login",
            ApiAction::Upload => "Upload",
            ApiAction::Query => "Query",
            ApiAction::Health => "Health check",
            ApiAction::ListTenants => "Tenant listing",
            ApiAction::CreateTenant => "Tenant creation",
            ApiAction::CreateUser => "User creation",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status. The body is kept verbatim.
    #[error("{action} failed: {status} {body}")]
    Api {
        action: ApiAction,
        status: u16,
        body: String,
    },

    #[error("{action} request could not be sent: {message}")]
    Transport { action: ApiAction, message: String },

    #[error("{action} response could not be decoded: {message}")]
    Decode { action: ApiAction, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DashboardError {
    /// True when the backend answered with a non-success status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, DashboardError::Api { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DashboardError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
