// file: src/view/controller.rs
// description: dashboard view sequencing login, upload and query against the backend
// reference: single stateful dashboard view with per-panel async outcomes

use super::phase::{Phase, Rejection};
use crate::api::DashboardApi;
use crate::config::Config;
use crate::error::{ApiAction, DashboardError, Result};
use crate::models::{
    History, LoginRequest, LoginResponse, QueryRequest, QueryResult, Session, UploadResult,
};
use crate::session::{KeyValueStorage, SessionStore};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub top_k: u32,
    pub history_limit: usize,
    pub answer_preview_chars: usize,
    pub source_preview_chars: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&Config::default_config())
    }
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.api.top_k,
            history_limit: config.ui.history_limit,
            answer_preview_chars: config.ui.answer_preview_chars,
            source_preview_chars: config.ui.source_preview_chars,
        }
    }
}

/// A submitted action waiting for its response. Carries the session epoch
/// that was current when the request went out.
#[derive(Debug)]
pub struct Pending<R> {
    epoch: u64,
    pub request: R,
}

#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub token: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct QueryTicket {
    pub token: String,
    pub query: QueryRequest,
}

/// Whether a finished request changed the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Discarded,
}

pub struct Dashboard<A, S> {
    api: A,
    store: SessionStore<S>,
    settings: ViewSettings,
    auth: Phase<Session>,
    upload: Phase<UploadResult>,
    query: Phase<QueryResult>,
    selected_file: Option<PathBuf>,
    history: History,
    epoch: u64,
}

impl<A: DashboardApi, S: KeyValueStorage> Dashboard<A, S> {
    /// Builds the view and restores a persisted session if one is complete.
    pub fn new(api: A, storage: S, settings: ViewSettings) -> Self {
        let store = SessionStore::new(storage);

        let auth = match store.restore() {
            Ok(Some(session)) => {
                info!("Resuming session for {}", session.email);
                Phase::Success(session)
            }
            Ok(None) => Phase::Idle,
            Err(e) => {
                warn!("Could not restore session: {}", e);
                Phase::Idle
            }
        };

        let history = History::new(settings.history_limit, settings.answer_preview_chars);

        Self {
            api,
            store,
            settings,
            auth,
            upload: Phase::Idle,
            query: Phase::Idle,
            selected_file: None,
            history,
            epoch: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn auth(&self) -> &Phase<Session> {
        &self.auth
    }

    pub fn upload_state(&self) -> &Phase<UploadResult> {
        &self.upload
    }

    pub fn query_state(&self) -> &Phase<QueryResult> {
        &self.query
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth.success()
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|session| session.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn into_storage(self) -> S {
        self.store.into_inner()
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.selected_file = Some(path.into());
    }

    /// Selects a file for upload after checking the session, then the file.
    pub fn choose_file(&mut self, path: impl Into<PathBuf>) -> std::result::Result<(), Rejection> {
        if !self.is_authenticated() {
            return Err(self.reject_upload(Rejection::NotAuthenticated));
        }

        let path = path.into();
        if let Err(e) = Validator::validate_upload_file(&path) {
            return Err(self.reject_upload(Rejection::UnreadableFile(e.to_string())));
        }

        self.select_file(path);
        Ok(())
    }

    pub fn begin_login(
        &mut self,
        tenant_id: &str,
        email: &str,
        password: &str,
    ) -> std::result::Result<Pending<LoginRequest>, Rejection> {
        if self.auth.is_loading() {
            return Err(Rejection::InFlight(ApiAction::Login));
        }
        if self.is_authenticated() {
            return Err(Rejection::AlreadyAuthenticated);
        }
        if [tenant_id, email, password]
            .iter()
            .any(|field| Validator::is_blank(field))
        {
            return Err(self.reject_login(Rejection::MissingCredentials));
        }

        self.auth = Phase::Loading;
        Ok(Pending {
            epoch: self.epoch,
            request: LoginRequest::new(tenant_id, email, password),
        })
    }

    pub fn finish_login(
        &mut self,
        pending: Pending<LoginRequest>,
        result: Result<LoginResponse>,
    ) -> Outcome {
        if !self.is_current(pending.epoch, self.auth.is_loading()) {
            debug!("Discarding stale login response");
            return Outcome::Discarded;
        }

        let result = result.and_then(|response| {
            if Validator::is_blank(&response.access_token) {
                Err(DashboardError::Decode {
                    action: ApiAction::Login,
                    message: "empty access token".to_string(),
                })
            } else {
                Ok(response)
            }
        });

        match result {
            Ok(response) => {
                let request = pending.request;
                let session = Session::new(&request.tenant_id, &request.email, &response.access_token);

                if let Err(e) = self.store.save(&session) {
                    warn!("Logged in but could not persist the session: {}", e);
                }

                info!("Logged in as {} (tenant {})", session.email, session.tenant_id);
                self.epoch += 1;
                self.auth = Phase::Success(session);
            }
            Err(e) => {
                self.auth = Phase::Error(panel_message(ApiAction::Login, &e));
            }
        }

        Outcome::Applied
    }

    pub async fn login(
        &mut self,
        tenant_id: &str,
        email: &str,
        password: &str,
    ) -> std::result::Result<Outcome, Rejection> {
        let pending = self.begin_login(tenant_id, email, password)?;
        let result = self.api.login(&pending.request).await;
        Ok(self.finish_login(pending, result))
    }

    pub fn begin_upload(&mut self) -> std::result::Result<Pending<UploadTicket>, Rejection> {
        if self.upload.is_loading() {
            return Err(Rejection::InFlight(ApiAction::Upload));
        }

        let Some(token) = self.token().map(str::to_string) else {
            return Err(self.reject_upload(Rejection::NotAuthenticated));
        };

        let Some(file) = self.selected_file.clone() else {
            return Err(self.reject_upload(Rejection::NoFileSelected));
        };

        self.upload = Phase::Loading;
        Ok(Pending {
            epoch: self.epoch,
            request: UploadTicket { token, file },
        })
    }

    pub fn finish_upload(
        &mut self,
        pending: Pending<UploadTicket>,
        result: Result<UploadResult>,
    ) -> Outcome {
        if !self.is_current(pending.epoch, self.upload.is_loading()) {
            debug!("Discarding stale upload response");
            return Outcome::Discarded;
        }

        self.upload = match result {
            Ok(uploaded) => {
                info!(
                    "Uploaded {} as document {}",
                    pending.request.file.display(),
                    uploaded.document_id
                );
                Phase::Success(uploaded)
            }
            Err(e) => Phase::Error(panel_message(ApiAction::Upload, &e)),
        };

        Outcome::Applied
    }

    pub async fn upload(&mut self) -> std::result::Result<Outcome, Rejection> {
        let pending = self.begin_upload()?;
        let ticket = &pending.request;
        let result = self.api.upload_document(&ticket.token, &ticket.file).await;
        Ok(self.finish_upload(pending, result))
    }

    pub fn begin_query(
        &mut self,
        question: &str,
    ) -> std::result::Result<Pending<QueryTicket>, Rejection> {
        if self.query.is_loading() {
            return Err(Rejection::InFlight(ApiAction::Query));
        }

        let Some(token) = self.token().map(str::to_string) else {
            return Err(self.reject_query(Rejection::NotAuthenticated));
        };

        if Validator::is_blank(question) {
            return Err(self.reject_query(Rejection::EmptyQuestion));
        }

        self.query = Phase::Loading;
        Ok(Pending {
            epoch: self.epoch,
            request: QueryTicket {
                token,
                query: QueryRequest::new(question, self.settings.top_k),
            },
        })
    }

    pub fn finish_query(
        &mut self,
        pending: Pending<QueryTicket>,
        result: Result<QueryResult>,
    ) -> Outcome {
        if !self.is_current(pending.epoch, self.query.is_loading()) {
            debug!("Discarding stale query response");
            return Outcome::Discarded;
        }

        self.query = match result {
            Ok(answer) => {
                self.history
                    .record(&pending.request.query.question, &answer.answer);
                Phase::Success(answer)
            }
            Err(e) => Phase::Error(panel_message(ApiAction::Query, &e)),
        };

        Outcome::Applied
    }

    pub async fn ask(&mut self, question: &str) -> std::result::Result<Outcome, Rejection> {
        let pending = self.begin_query(question)?;
        let ticket = &pending.request;
        let result = self.api.query_data(&ticket.token, &ticket.query).await;
        Ok(self.finish_query(pending, result))
    }

    /// Always succeeds. Storage failures are logged and the view is reset
    /// regardless.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Could not clear the persisted session: {}", e);
        }

        if let Some(session) = self.session() {
            info!("Logged out {}", session.email);
        }

        self.epoch += 1;
        self.auth = Phase::Idle;
        self.upload = Phase::Idle;
        self.query = Phase::Idle;
        self.selected_file = None;
        self.history.clear();
    }

    fn is_current(&self, epoch: u64, loading: bool) -> bool {
        epoch == self.epoch && loading
    }

    fn reject_login(&mut self, rejection: Rejection) -> Rejection {
        self.auth = Phase::Error(rejection.to_string());
        rejection
    }

    fn reject_upload(&mut self, rejection: Rejection) -> Rejection {
        self.upload = Phase::Error(rejection.to_string());
        rejection
    }

    fn reject_query(&mut self, rejection: Rejection) -> Rejection {
        self.query = Phase::Error(rejection.to_string());
        rejection
    }
}

/// HTTP status failures show the combined status and body; anything else
/// falls back to the generic per-action message.
fn panel_message(action: ApiAction, error: &DashboardError) -> String {
    if error.is_http_status() {
        error.to_string()
    } else {
        warn!("{} failed: {}", action, error);
        format!("{} failed", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceChunk;
    use crate::session::{MemoryStorage, TOKEN_KEY};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Login(String, String),
        Upload(String, PathBuf),
        Query(String, String, u32),
    }

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        reject_login: bool,
        empty_token: bool,
        query_status: Mutex<Option<u16>>,
        query_unreachable: bool,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
            self.calls.lock().unwrap().push(Call::Login(
                request.tenant_id.clone(),
                request.email.clone(),
            ));
            if self.reject_login {
                return Err(DashboardError::Api {
                    action: ApiAction::Login,
                    status: 401,
                    body: "bad credentials".to_string(),
                });
            }
            let token = if self.empty_token { "" } else { "tok123" };
            Ok(LoginResponse {
                access_token: token.to_string(),
                token_type: "bearer".to_string(),
            })
        }

        async fn upload_document(&self, token: &str, file: &Path) -> Result<UploadResult> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Upload(token.to_string(), file.to_path_buf()));
            Ok(UploadResult {
                document_id: "D1".to_string(),
                status: "ready".to_string(),
                tenant_id: None,
                filename: None,
            })
        }

        async fn query_data(&self, token: &str, request: &QueryRequest) -> Result<QueryResult> {
            self.calls.lock().unwrap().push(Call::Query(
                token.to_string(),
                request.question.clone(),
                request.top_k,
            ));
            if let Some(status) = *self.query_status.lock().unwrap() {
                return Err(DashboardError::Api {
                    action: ApiAction::Query,
                    status,
                    body: "boom".to_string(),
                });
            }
            if self.query_unreachable {
                return Err(DashboardError::Transport {
                    action: ApiAction::Query,
                    message: "connection refused".to_string(),
                });
            }
            Ok(QueryResult {
                answer: format!("Answer to {}", request.question),
                sources: vec![SourceChunk {
                    document_id: "D1".to_string(),
                    chunk_index: 0,
                    text: "...".to_string(),
                }],
            })
        }
    }

    fn dashboard(api: FakeApi) -> Dashboard<FakeApi, MemoryStorage> {
        Dashboard::new(api, MemoryStorage::new(), ViewSettings::default())
    }

    async fn logged_in(api: FakeApi) -> Dashboard<FakeApi, MemoryStorage> {
        let mut view = dashboard(api);
        view.login("T1", "a@b.com", "x").await.unwrap();
        view
    }

    #[tokio::test]
    async fn test_login_persists_and_reload_restores() {
        let view = logged_in(FakeApi::default()).await;
        assert_eq!(view.token(), Some("tok123"));

        let storage = view.into_storage();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok123"));

        let reloaded = Dashboard::new(FakeApi::default(), storage, ViewSettings::default());
        let session = reloaded.session().unwrap();
        assert_eq!(session.tenant_id, "T1");
        assert_eq!(session.email, "a@b.com");
        assert_eq!(session.token, "tok123");
    }

    #[tokio::test]
    async fn test_failed_login_stays_unauthenticated() {
        let mut view = dashboard(FakeApi {
            reject_login: true,
            ..FakeApi::default()
        });

        let outcome = view.login("T1", "a@b.com", "wrong").await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(view.token(), None);
        assert_eq!(view.auth().error(), Some("Login failed: 401 bad credentials"));

        let storage = view.into_storage();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_login_with_empty_token_is_a_failure() {
        let mut view = dashboard(FakeApi {
            empty_token: true,
            ..FakeApi::default()
        });

        let outcome = view.login("T1", "a@b.com", "x").await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert!(!view.is_authenticated());
        assert_eq!(view.auth().error(), Some("Login failed"));

        let storage = view.into_storage();
        assert!(storage.is_empty());

        let reloaded = Dashboard::new(FakeApi::default(), storage, ViewSettings::default());
        assert!(!reloaded.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_all_fields() {
        let mut view = dashboard(FakeApi::default());
        let rejection = view.login("T1", " ", "x").await.unwrap_err();
        assert_eq!(rejection, Rejection::MissingCredentials);
        assert!(view.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_login_is_rejected_locally() {
        let mut view = dashboard(FakeApi::default());
        view.select_file("contract.pdf");

        let rejection = view.upload().await.unwrap_err();
        assert_eq!(rejection, Rejection::NotAuthenticated);
        assert_eq!(view.upload_state().error(), Some("You must be logged in."));
        assert!(view.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_choosing_a_file_checks_session_before_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");

        let mut view = dashboard(FakeApi::default());
        assert_eq!(
            view.choose_file(&missing).unwrap_err(),
            Rejection::NotAuthenticated
        );
        assert_eq!(view.upload_state().error(), Some("You must be logged in."));

        view.login("T1", "a@b.com", "x").await.unwrap();
        assert!(matches!(
            view.choose_file(&missing),
            Err(Rejection::UnreadableFile(_))
        ));
        assert!(view.selected_file().is_none());

        let present = dir.path().join("contract.pdf");
        std::fs::write(&present, b"%PDF").unwrap();
        view.choose_file(&present).unwrap();
        assert_eq!(view.selected_file(), Some(present.as_path()));
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected_locally() {
        let mut view = logged_in(FakeApi::default()).await;

        let rejection = view.upload().await.unwrap_err();
        assert_eq!(rejection, Rejection::NoFileSelected);
        assert_eq!(
            view.upload_state().error(),
            Some("Please select a file first.")
        );
        assert_eq!(view.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_sends_token_and_file() {
        let mut view = logged_in(FakeApi::default()).await;
        view.select_file("contract.pdf");

        view.upload().await.unwrap();
        assert_eq!(
            view.upload_state().success().unwrap().status_message(),
            "Uploaded. Document ID: D1, status: ready"
        );
        assert_eq!(
            view.api().calls()[1],
            Call::Upload("tok123".to_string(), PathBuf::from("contract.pdf"))
        );
    }

    #[tokio::test]
    async fn test_blank_question_never_calls_backend() {
        let mut view = logged_in(FakeApi::default()).await;

        for question in ["", "   ", "\n\t"] {
            assert_eq!(view.ask(question).await, Err(Rejection::EmptyQuestion));
        }
        assert_eq!(view.query_state().error(), Some("Please enter a question."));
        assert_eq!(view.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_query_scenario_uses_bearer_token() {
        let mut view = logged_in(FakeApi::default()).await;

        view.ask("What is X?").await.unwrap();
        assert_eq!(
            view.api().calls()[1],
            Call::Query("tok123".to_string(), "What is X?".to_string(), 5)
        );

        let result = view.query_state().success().unwrap();
        assert_eq!(result.answer, "Answer to What is X?");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(view.history().latest().unwrap().question, "What is X?");
    }

    #[tokio::test]
    async fn test_history_keeps_five_most_recent() {
        let mut view = logged_in(FakeApi::default()).await;
        for i in 1..=6 {
            view.ask(&format!("q{}", i)).await.unwrap();
        }

        let questions: Vec<String> = view
            .history()
            .entries()
            .map(|entry| entry.question.clone())
            .collect();
        assert_eq!(questions, vec!["q6", "q5", "q4", "q3", "q2"]);
    }

    #[tokio::test]
    async fn test_http_failure_clears_stale_result() {
        let mut view = logged_in(FakeApi::default()).await;
        view.ask("first").await.unwrap();
        assert!(view.query_state().success().is_some());

        *view.api().query_status.lock().unwrap() = Some(500);
        view.ask("second").await.unwrap();

        assert_eq!(view.query_state().error(), Some("Query failed: 500 boom"));
        assert!(view.query_state().success().is_none());
        assert_eq!(view.history().len(), 1);
        assert_eq!(view.history().latest().unwrap().question, "first");
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let mut view = logged_in(FakeApi {
            query_unreachable: true,
            ..FakeApi::default()
        })
        .await;

        view.ask("anyone there?").await.unwrap();
        assert_eq!(view.query_state().error(), Some("Query failed"));
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let mut view = logged_in(FakeApi::default()).await;
        view.select_file("contract.pdf");
        view.upload().await.unwrap();
        view.ask("What is X?").await.unwrap();

        view.logout();

        assert!(!view.is_authenticated());
        assert!(view.auth().is_idle());
        assert!(view.upload_state().is_idle());
        assert!(view.query_state().is_idle());
        assert!(view.selected_file().is_none());
        assert!(view.history().is_empty());
        assert!(view.into_storage().is_empty());
    }

    #[tokio::test]
    async fn test_response_after_logout_is_discarded() {
        let mut view = logged_in(FakeApi::default()).await;

        let pending = view.begin_query("What is X?").unwrap();
        view.logout();

        let outcome = view.finish_query(
            pending,
            Ok(QueryResult {
                answer: "late".to_string(),
                sources: vec![],
            }),
        );

        assert_eq!(outcome, Outcome::Discarded);
        assert!(view.query_state().is_idle());
        assert!(view.history().is_empty());
    }

    #[tokio::test]
    async fn test_response_from_previous_session_is_discarded_after_relogin() {
        let mut view = logged_in(FakeApi::default()).await;
        view.select_file("a.pdf");
        let stale = view.begin_upload().unwrap();

        view.logout();
        view.login("T2", "c@d.com", "y").await.unwrap();
        view.select_file("b.pdf");
        let fresh = view.begin_upload().unwrap();

        let uploaded = UploadResult {
            document_id: "OLD".to_string(),
            status: "ready".to_string(),
            tenant_id: None,
            filename: None,
        };
        assert_eq!(view.finish_upload(stale, Ok(uploaded)), Outcome::Discarded);
        assert!(view.upload_state().is_loading());

        let uploaded = UploadResult {
            document_id: "NEW".to_string(),
            status: "ready".to_string(),
            tenant_id: None,
            filename: None,
        };
        assert_eq!(view.finish_upload(fresh, Ok(uploaded)), Outcome::Applied);
        assert_eq!(view.upload_state().success().unwrap().document_id, "NEW");
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_rejected_but_actions_are_independent() {
        let mut view = logged_in(FakeApi::default()).await;
        view.select_file("contract.pdf");

        let query = view.begin_query("What is X?").unwrap();
        assert_eq!(
            view.begin_query("again").unwrap_err(),
            Rejection::InFlight(ApiAction::Query)
        );

        let upload = view.begin_upload().unwrap();
        assert!(view.query_state().is_loading());

        let failed = Err(DashboardError::Api {
            action: ApiAction::Upload,
            status: 413,
            body: "too large".to_string(),
        });
        view.finish_upload(upload, failed);
        assert_eq!(
            view.upload_state().error(),
            Some("Upload failed: 413 too large")
        );
        assert!(view.query_state().is_loading());

        view.finish_query(
            query,
            Ok(QueryResult {
                answer: "X is Y".to_string(),
                sources: vec![],
            }),
        );
        assert_eq!(view.query_state().success().unwrap().answer, "X is Y");
    }

    #[tokio::test]
    async fn test_login_while_authenticated_is_rejected() {
        let mut view = logged_in(FakeApi::default()).await;
        assert_eq!(
            view.login("T1", "a@b.com", "x").await,
            Err(Rejection::AlreadyAuthenticated)
        );
        assert_eq!(view.api().calls().len(), 1);
    }
}
