// file: src/models/document.rs
// description: Upload response model
// reference: POST /upload

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResult {
    pub document_id: String,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl UploadResult {
    /// Status line shown in the upload panel.
    pub fn status_message(&self) -> String {
        format!(
            "Uploaded. Document ID: {}, status: {}",
            self.document_id, self.status
        )
    }
}
