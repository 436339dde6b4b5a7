// file: src/shell.rs
// description: command parsing and request driver for the interactive dashboard shell
// reference: commandline application command handling

use crate::api::DashboardApi;
use crate::error::{ApiAction, DashboardError, Result};
use crate::models::{LoginRequest, LoginResponse, QueryResult, UploadResult};
use crate::session::KeyValueStorage;
use crate::view::{Dashboard, Outcome, Pending, QueryTicket, Rejection, UploadTicket};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::path::PathBuf;
use tracing::debug;

pub const HELP: &str = "\
Commands:
  login <tenant-id> <email> <password>   log in and remember the session
                                         (the password is the rest of the line)
  file <path>                            select a document to upload
  upload [path]                          upload the selected (or given) file
  ask <question>                         ask a question about your documents
  history                                list the most recent questions
  status                                 show every panel
  logout                                 forget the session and reset the view
  help                                   show this help
  quit                                   leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login {
        tenant_id: String,
        email: String,
        password: String,
    },
    SelectFile(PathBuf),
    Upload(Option<PathBuf>),
    Ask(String),
    History,
    Status,
    Logout,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Empty,
            "login" => {
                let fields = rest.split_once(char::is_whitespace).and_then(|(tenant_id, rest)| {
                    let (email, password) = rest.trim_start().split_once(char::is_whitespace)?;
                    Some((tenant_id, email, password.trim_start()))
                });
                match fields {
                    Some((tenant_id, email, password)) if !password.is_empty() => {
                        ShellCommand::Login {
                            tenant_id: tenant_id.to_string(),
                            email: email.to_string(),
                            password: password.to_string(),
                        }
                    }
                    _ => return Err(usage("login <tenant-id> <email> <password>")),
                }
            }
            "file" | "select" => {
                if rest.is_empty() {
                    return Err(usage("file <path>"));
                }
                ShellCommand::SelectFile(PathBuf::from(rest))
            }
            "upload" => ShellCommand::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
            // blank questions are refused by the view, not here
            "ask" | "query" => ShellCommand::Ask(rest.to_string()),
            "history" => ShellCommand::History,
            "status" => ShellCommand::Status,
            "logout" => ShellCommand::Logout,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(DashboardError::Validation(format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    other
                )));
            }
        };

        Ok(command)
    }
}

fn usage(text: &str) -> DashboardError {
    DashboardError::Validation(format!("Usage: {}", text))
}

/// What the shell did with a command, for the caller to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Started(ApiAction),
    Rejected(ApiAction, Rejection),
    FileSelected,
    LoggedOut,
    ShowHelp,
    ShowStatus,
    ShowHistory,
    Quit,
    Nothing,
}

enum Completion {
    Login(Pending<LoginRequest>, Result<LoginResponse>),
    Upload(Pending<UploadTicket>, Result<UploadResult>),
    Query(Pending<QueryTicket>, Result<QueryResult>),
}

/// Runs shell commands against a dashboard without waiting for responses,
/// so later commands (including logout) are handled while requests are in
/// flight. Responses are applied through the view as they complete.
pub struct ShellSession<A, S> {
    view: Dashboard<A, S>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<A, S> ShellSession<A, S>
where
    A: DashboardApi + Clone + 'static,
    S: KeyValueStorage,
{
    pub fn new(view: Dashboard<A, S>) -> Self {
        Self {
            view,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn view(&self) -> &Dashboard<A, S> {
        &self.view
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn submit(&mut self, command: ShellCommand) -> ShellEvent {
        match command {
            ShellCommand::Empty => ShellEvent::Nothing,
            ShellCommand::Quit => ShellEvent::Quit,
            ShellCommand::Help => ShellEvent::ShowHelp,
            ShellCommand::Status => ShellEvent::ShowStatus,
            ShellCommand::History => ShellEvent::ShowHistory,
            ShellCommand::Logout => {
                self.view.logout();
                ShellEvent::LoggedOut
            }
            ShellCommand::SelectFile(path) => match self.view.choose_file(path) {
                Ok(()) => ShellEvent::FileSelected,
                Err(rejection) => ShellEvent::Rejected(ApiAction::Upload, rejection),
            },
            ShellCommand::Login {
                tenant_id,
                email,
                password,
            } => match self.view.begin_login(&tenant_id, &email, &password) {
                Ok(pending) => self.spawn_login(pending),
                Err(rejection) => ShellEvent::Rejected(ApiAction::Login, rejection),
            },
            ShellCommand::Upload(path) => {
                if let Some(path) = path
                    && let Err(rejection) = self.view.choose_file(path)
                {
                    return ShellEvent::Rejected(ApiAction::Upload, rejection);
                }
                match self.view.begin_upload() {
                    Ok(pending) => self.spawn_upload(pending),
                    Err(rejection) => ShellEvent::Rejected(ApiAction::Upload, rejection),
                }
            }
            ShellCommand::Ask(question) => match self.view.begin_query(&question) {
                Ok(pending) => self.spawn_query(pending),
                Err(rejection) => ShellEvent::Rejected(ApiAction::Query, rejection),
            },
        }
    }

    /// Waits for the next in-flight request and applies it to the view.
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<(ApiAction, Outcome)> {
        let completion = self.in_flight.next().await?;

        let applied = match completion {
            Completion::Login(pending, result) => {
                (ApiAction::Login, self.view.finish_login(pending, result))
            }
            Completion::Upload(pending, result) => {
                (ApiAction::Upload, self.view.finish_upload(pending, result))
            }
            Completion::Query(pending, result) => {
                (ApiAction::Query, self.view.finish_query(pending, result))
            }
        };

        debug!("{} completed: {:?}", applied.0, applied.1);
        Some(applied)
    }

    pub fn into_view(self) -> Dashboard<A, S> {
        self.view
    }

    fn spawn_login(&mut self, pending: Pending<LoginRequest>) -> ShellEvent {
        let api = self.view.api().clone();
        self.in_flight.push(
            async move {
                let result = api.login(&pending.request).await;
                Completion::Login(pending, result)
            }
            .boxed(),
        );
        ShellEvent::Started(ApiAction::Login)
    }

    fn spawn_upload(&mut self, pending: Pending<UploadTicket>) -> ShellEvent {
        let api = self.view.api().clone();
        self.in_flight.push(
            async move {
                let ticket = &pending.request;
                let result = api.upload_document(&ticket.token, &ticket.file).await;
                Completion::Upload(pending, result)
            }
            .boxed(),
        );
        ShellEvent::Started(ApiAction::Upload)
    }

    fn spawn_query(&mut self, pending: Pending<QueryTicket>) -> ShellEvent {
        let api = self.view.api().clone();
        self.in_flight.push(
            async move {
                let ticket = &pending.request;
                let result = api.query_data(&ticket.token, &ticket.query).await;
                Completion::Query(pending, result)
            }
            .boxed(),
        );
        ShellEvent::Started(ApiAction::Query)
    }
}
