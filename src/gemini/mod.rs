mod client;
mod types;

pub(crate) use client::GeminiClient;
pub(crate) use types::{ExtractedBudget, FilePayload};

use crate::models::AttachedFile;

/// Convert a budget's attachments into extraction payloads. Files whose
/// url is not a data-URI (e.g. external links) go by name only.
pub(crate) fn payloads_from_files(files: &[AttachedFile]) -> Vec<FilePayload> {
    files
        .iter()
        .map(|f| FilePayload {
            name: f.name.clone(),
            data: f.base64_data().map(str::to_string),
            mime_type: f.kind.mime_type().to_string(),
        })
        .collect()
}
