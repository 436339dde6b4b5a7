// file: src/api/client.rs
// description: reqwest client for the document question answering backend
// reference: https://docs.rs/reqwest

use super::DashboardApi;
use crate::config::ApiConfig;
use crate::error::{ApiAction, DashboardError, Result};
use crate::models::{
    LoginRequest, LoginResponse, NewTenant, NewUser, QueryRequest, QueryResult, Tenant,
    UploadResult, User,
};
use crate::utils::{HealthCheck, HealthReport, OperationTimer};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and decodes a JSON body. Non-success statuses keep
    /// the raw response text.
    async fn send_json<T: DeserializeOwned>(
        &self,
        action: ApiAction,
        request: RequestBuilder,
    ) -> Result<T> {
        let timer = OperationTimer::new(&action.to_string());

        let response = request
            .send()
            .await
            .map_err(|e| DashboardError::Transport {
                action,
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Transport {
                action,
                message: e.to_string(),
            })?;

        timer.warn_if_slow(SLOW_REQUEST_THRESHOLD);
        timer.finish();

        if !status.is_success() {
            warn!("{} request failed with status {}", action, status);
            return Err(DashboardError::Api {
                action,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DashboardError::Decode {
            action,
            message: e.to_string(),
        })
    }

    pub async fn health(&self) -> HealthReport {
        let timer = OperationTimer::new("health");
        let result = self
            .send_json::<HealthBody>(ApiAction::Health, self.client.get(self.endpoint("health")))
            .await;
        let elapsed = timer.elapsed();

        let check = match result {
            Ok(body) if body.status == "ok" => HealthCheck::healthy("api", elapsed),
            Ok(body) => HealthCheck::degraded(
                "api",
                format!("Unexpected health status: {}", body.status),
                elapsed,
            ),
            Err(e) => HealthCheck::unhealthy("api", e.to_string(), elapsed),
        };

        HealthReport::new(&self.base_url, vec![check])
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        self.send_json(
            ApiAction::ListTenants,
            self.client.get(self.endpoint("tenants")),
        )
        .await
    }

    pub async fn create_tenant(&self, name: &str) -> Result<Tenant> {
        let body = NewTenant {
            name: name.to_string(),
        };
        let tenant: Tenant = self
            .send_json(
                ApiAction::CreateTenant,
                self.client.post(self.endpoint("tenants")).json(&body),
            )
            .await?;
        info!("Created tenant {} ({})", tenant.name, tenant.id);
        Ok(tenant)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let created: User = self
            .send_json(
                ApiAction::CreateUser,
                self.client.post(self.endpoint("users")).json(user),
            )
            .await?;
        info!("Created user {} in tenant {}", created.email, created.tenant_id);
        Ok(created)
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        debug!(
            "Logging in {} for tenant {}",
            request.email, request.tenant_id
        );
        self.send_json(
            ApiAction::Login,
            self.client.post(self.endpoint("auth/login")).json(request),
        )
        .await
    }

    async fn upload_document(&self, token: &str, file: &Path) -> Result<UploadResult> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| DashboardError::FileOperation {
                path: file.to_path_buf(),
                source: e,
            })?;

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        self.send_json(
            ApiAction::Upload,
            self.client
                .post(self.endpoint("upload"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    async fn query_data(&self, token: &str, request: &QueryRequest) -> Result<QueryResult> {
        debug!(
            "Asking question ({} chars, top_k={})",
            request.question.chars().count(),
            request.top_k
        );
        self.send_json(
            ApiAction::Query,
            self.client
                .post(self.endpoint("query"))
                .bearer_auth(token)
                .json(request),
        )
        .await
    }
}
