// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod shell;
pub mod utils;
pub mod view;

pub use api::{ApiClient, DashboardApi};
pub use config::{ApiConfig, Config, SessionConfig, UiConfig};
pub use error::{ApiAction, DashboardError, Result};
pub use models::{
    History, HistoryEntry, LoginRequest, LoginResponse, QueryRequest, QueryResult, Session,
    SourceChunk, Tenant, UploadResult, User,
};
pub use session::{FileStorage, KeyValueStorage, MemoryStorage, SessionStore};
pub use shell::{ShellCommand, ShellEvent, ShellSession};
pub use utils::{HealthReport, HealthStatus, LoadingSpinner, Validator};
pub use view::{Dashboard, Outcome, Phase, Rejection, ViewSettings};
