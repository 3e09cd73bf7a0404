use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── generateContent wire types ────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub(crate) parts: Vec<Part>,
}

/// One part of a content block: plain text or inline binary data, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) inline_data: Option<InlineData>,
}

impl Part {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub(crate) fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub(crate) mime_type: String,
    /// Base64-encoded payload.
    pub(crate) data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub(crate) content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's text parts.
    pub(crate) fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline-image payload anywhere in the first candidate.
    pub(crate) fn first_inline_image(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

// ── Extraction result ─────────────────────────────────────────

/// One user-attached document handed to the extraction service.
#[derive(Debug, Clone)]
pub(crate) struct FilePayload {
    pub(crate) name: String,
    /// Base64 content, if the source carried any.
    pub(crate) data: Option<String>,
    pub(crate) mime_type: String,
}

/// Sparse field candidates extracted from the attached documents. The
/// service is trusted to return well-formed JSON matching this shape; a
/// parse failure is a hard failure of the whole call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtractedBudget {
    #[serde(default)]
    pub(crate) client_name: Option<String>,
    #[serde(default)]
    pub(crate) service_description: Option<String>,
    #[serde(default)]
    pub(crate) budget_amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) date: Option<String>,
    /// Authoritative: absence means the documents show no explicit discount.
    #[serde(default)]
    pub(crate) discount: Option<Decimal>,
    #[serde(default)]
    pub(crate) requester: Option<String>,
    /// Present only when a document evidences a purchase order.
    #[serde(default)]
    pub(crate) order_number: Option<String>,
}
