// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod admin;
pub mod auth;
pub mod document;
pub mod history;
pub mod query;
pub mod session;

pub use admin::{NewTenant, NewUser, Tenant, User};
pub use auth::{LoginRequest, LoginResponse};
pub use document::UploadResult;
pub use history::{History, HistoryEntry};
pub use query::{QueryRequest, QueryResult, SourceChunk};
pub use session::Session;
