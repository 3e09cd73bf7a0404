use base64::Engine;
use serde::{Deserialize, Serialize};

/// Broad classification of an attached file, derived from content at
/// attach time. The stored documents use lowercase labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Spreadsheet,
    Other,
}

impl FileKind {
    /// Classify by magic bytes first, filename extension as fallback.
    pub fn classify(name: &str, content: &[u8]) -> Self {
        if content.starts_with(b"%PDF") {
            return Self::Pdf;
        }
        if content.starts_with(&[0x89, b'P', b'N', b'G'])
            || content.starts_with(&[0xFF, 0xD8, 0xFF])
            || content.starts_with(b"GIF8")
            || (content.len() > 11 && content[..4] == *b"RIFF" && content[8..12] == *b"WEBP")
        {
            return Self::Image;
        }

        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".png")
            || lower.ends_with(".jpg")
            || lower.ends_with(".jpeg")
            || lower.ends_with(".webp")
            || lower.ends_with(".gif")
        {
            Self::Image
        } else if lower.ends_with(".csv") || lower.ends_with(".xls") || lower.ends_with(".xlsx") {
            Self::Spreadsheet
        } else {
            Self::Other
        }
    }

    /// Mime type sent to the extraction service for this kind of file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Image => "image/png",
            Self::Pdf => "application/pdf",
            Self::Spreadsheet => "text/plain",
            Self::Other => "application/octet-stream",
        }
    }
}

/// A file attached to a budget. `url` carries the content as a data-URI
/// (or an external link for records imported from elsewhere) and is opaque
/// to everything except the AI clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

impl AttachedFile {
    /// Build from raw content: classify, assign a local id, embed the
    /// content as a base64 data-URI.
    pub fn from_content(name: &str, content: &[u8]) -> Self {
        let kind = FileKind::classify(name, content);
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            url: format!("data:{};base64,{encoded}", kind.mime_type()),
            kind,
        }
    }

    /// The base64 payload of a data-URI url, if this file carries one.
    pub fn base64_data(&self) -> Option<&str> {
        self.url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .map(|(_, data)| data)
    }
}
