// file: src/render/mod.rs
// description: terminal rendering module exports
// reference: internal module structure

pub mod panels;

pub use panels::{
    render_dashboard, render_history, render_login_panel, render_query_panel,
    render_session, render_source, render_upload_panel,
};
