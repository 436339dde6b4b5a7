// file: src/utils/validation.rs
// description: input validation helpers shared by the view and the cli
// reference: input validation patterns

use crate::error::{DashboardError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use uuid::Uuid;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern");
}

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DashboardError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_tenant_id(tenant_id: &str) -> Result<Uuid> {
        Uuid::parse_str(tenant_id.trim()).map_err(|_| {
            DashboardError::Validation(format!("Tenant ID is not a UUID: {}", tenant_id))
        })
    }

    pub fn validate_email(email: &str) -> Result<()> {
        if !EMAIL_PATTERN.is_match(email.trim()) {
            return Err(DashboardError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }
        Ok(())
    }

    pub fn validate_upload_file(path: &Path) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| DashboardError::FileOperation {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_file() {
            return Err(DashboardError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn is_blank(text: &str) -> bool {
        text.trim().is_empty()
    }

    /// Keeps at most `max_chars` characters and marks the cut with `...`.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((cut, _)) => format!("{}...", &text[..cut]),
        }
    }
}
