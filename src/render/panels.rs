// file: src/render/panels.rs
// description: text rendering of the dashboard panels for the terminal
// reference: search result display of the cli

use crate::api::DashboardApi;
use crate::models::{History, QueryResult, Session, SourceChunk, UploadResult};
use crate::session::KeyValueStorage;
use crate::utils::Validator;
use crate::utils::logging::{format_error, format_heading, format_info, format_success};
use crate::view::{Dashboard, Phase};
use std::path::Path;

pub fn render_session(session: Option<&Session>) -> String {
    match session {
        Some(session) => format_success(&format!(
            "Logged in as {} (tenant {})",
            session.email, session.tenant_id
        )),
        None => format_info("Not logged in."),
    }
}

pub fn render_login_panel(auth: &Phase<Session>) -> String {
    let mut out = format_heading("Login");
    out.push('\n');
    match auth {
        Phase::Idle => out.push_str("Enter tenant ID, email and password."),
        Phase::Loading => out.push_str("Logging in..."),
        Phase::Success(session) => out.push_str(&render_session(Some(session))),
        Phase::Error(message) => out.push_str(&format_error(message)),
    }
    out
}

pub fn render_upload_panel(selected: Option<&Path>, upload: &Phase<UploadResult>) -> String {
    let mut out = format_heading("Upload document");
    out.push('\n');

    match selected {
        Some(path) => out.push_str(&format!("Selected file: {}", path.display())),
        None => out.push_str("No file selected."),
    }

    match upload {
        Phase::Idle => {}
        Phase::Loading => out.push_str("\nUploading..."),
        Phase::Success(result) => {
            out.push('\n');
            out.push_str(&format_success(&result.status_message()));
        }
        Phase::Error(message) => {
            out.push('\n');
            out.push_str(&format_error(message));
        }
    }

    out
}

/// One cited chunk: a reference line followed by the text, cut after
/// `max_chars` characters.
pub fn render_source(source: &SourceChunk, max_chars: usize) -> String {
    format!(
        "- Document: {} | Chunk: {}\n  {}",
        source.document_id,
        source.chunk_index,
        Validator::truncate_text(&source.text, max_chars)
    )
}

pub fn render_query_panel(query: &Phase<QueryResult>, source_preview_chars: usize) -> String {
    let mut out = format_heading("Ask your data");
    out.push('\n');

    match query {
        Phase::Idle => out.push_str("Ask a question about your documents."),
        Phase::Loading => out.push_str("Asking..."),
        Phase::Error(message) => out.push_str(&format_error(message)),
        Phase::Success(result) => {
            out.push_str(&format_heading("Answer"));
            out.push('\n');
            out.push_str(&result.answer);
            out.push_str("\n\n");
            out.push_str(&format_heading("Sources"));

            if !result.has_sources() {
                out.push_str("\n(none)");
            }
            for source in &result.sources {
                out.push('\n');
                out.push_str(&render_source(source, source_preview_chars));
            }
        }
    }

    out
}

pub fn render_history(history: &History) -> String {
    let mut out = format_heading("Recent questions");

    if history.is_empty() {
        out.push_str("\n(none yet)");
        return out;
    }

    for (idx, entry) in history.entries().enumerate() {
        out.push_str(&format!(
            "\n{}. [{}] {}\n   {}",
            idx + 1,
            entry.asked_at.format("%H:%M:%S"),
            entry.question,
            entry.answer_preview
        ));
    }

    out
}

/// Mirrors the page: only the login panel while unauthenticated, the
/// upload and query panels plus history once logged in.
pub fn render_dashboard<A: DashboardApi, S: KeyValueStorage>(view: &Dashboard<A, S>) -> String {
    if !view.is_authenticated() {
        return render_login_panel(view.auth());
    }

    [
        render_session(view.session()),
        render_upload_panel(view.selected_file(), view.upload_state()),
        render_query_panel(view.query_state(), view.settings().source_preview_chars),
        render_history(view.history()),
    ]
    .join("\n\n")
}
