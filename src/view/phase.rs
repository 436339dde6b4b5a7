// file: src/view/phase.rs
// description: explicit per-panel state and local rejection reasons
// reference: tagged state per dashboard concern

use crate::error::ApiAction;
use thiserror::Error;

/// State of one panel. Loading and an error message can never coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Phase<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Phase::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Why a submission was refused before any request went out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You must be logged in.")]
    NotAuthenticated,

    #[error("Please select a file first.")]
    NoFileSelected,

    #[error("{0}")]
    UnreadableFile(String),

    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Tenant ID, email and password are required.")]
    MissingCredentials,

    #[error("Already logged in. Log out first.")]
    AlreadyAuthenticated,

    #[error("{0} already in progress.")]
    InFlight(ApiAction),
}
