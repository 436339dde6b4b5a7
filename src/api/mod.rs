// file: src/api/mod.rs
// description: backend api seam used by the dashboard view
// reference: internal module structure

pub mod client;

pub use client::ApiClient;

use crate::error::Result;
use crate::models::{LoginRequest, LoginResponse, QueryRequest, QueryResult, UploadResult};
use async_trait::async_trait;
use std::path::Path;

/// The three calls the dashboard view makes. Each is a single request with
/// no retry; a non-success status becomes `DashboardError::Api`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    async fn upload_document(&self, token: &str, file: &Path) -> Result<UploadResult>;

    async fn query_data(&self, token: &str, request: &QueryRequest) -> Result<QueryResult>;
}
