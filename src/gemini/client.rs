use anyhow::{Context, Result};
use std::time::Duration;

use super::types::{
    ExtractedBudget, FilePayload, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Content, Part,
};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const EXTRACTION_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Mime types the extraction model accepts as inline data. Anything else
/// is described by filename only.
const INLINE_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/webp",
    "text/plain",
];

const EXTRACTION_PROMPT: &str = "\
Você é um assistente especializado em orçamentos de engenharia civil (ConstruCost).

O usuário mantém uma planilha de controle com as colunas: Data, Nome Cliente, \
Descrição Serviços, Valor Orçamento, Desconto, Pedido, Solicitante. Extraia os \
dados dos documentos anexados para preencher exatamente estes campos.

Retorne APENAS um objeto JSON com os campos:
- clientName: nome da empresa cliente.
- serviceDescription: PREFERÊNCIA: códigos como \"PRxxxx\", \"CC xxxx\"; senão o \
título do serviço; senão o nome do arquivo principal limpo.
- budgetAmount: valor monetário total da proposta (Number).
- date: data encontrada no documento (YYYY-MM-DD).
- requester: pessoa citada como solicitante ou responsável.
- orderNumber: número do Pedido de Compra (PO), ex: \"4500694477\". Se for \
apenas um orçamento, deixe null.
- discount: REGRA RÍGIDA: procure EXPLICITAMENTE por \"Desconto\", \
\"Abatimento\" ou \"Dedução\". Se não houver linha explícita de desconto, \
RETORNE 0. Não infira descontos por diferenças de valores.

Priorize o documento mais recente se houver múltiplos.";

/// Blocking HTTP client for the Gemini generateContent API.
///
/// Both operations are stateless request/response wrappers: any transport
/// or parse error surfaces as one opaque failure, with no retry and no
/// partial result.
pub(crate) struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub(crate) fn new(api_key: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for tests against a local server).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/models/{model}:generateContent?key={}",
            self.base_url, self.api_key
        );
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .context("Request to the AI service failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!(
                "AI service returned {status}: {}",
                crate::util::truncate(&body, 200)
            );
        }

        response
            .json()
            .context("AI service returned an unreadable response")
    }

    /// Send the attached documents and parse the constrained-schema JSON
    /// answer into budget field candidates.
    pub(crate) fn extract_budget_data(&self, files: &[FilePayload]) -> Result<ExtractedBudget> {
        let mut parts = vec![Part::text(EXTRACTION_PROMPT)];
        for file in files {
            parts.push(Part::text(format!("Nome do Arquivo: {}", file.name)));
            let mime = mime_for(file);
            if INLINE_MIME_TYPES.contains(&mime.as_str()) {
                if let Some(data) = &file.data {
                    parts.push(Part::inline_data(mime, data.clone()));
                }
            }
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
            }),
        };

        let response = self.generate(EXTRACTION_MODEL, &request)?;
        let text = response
            .text()
            .ok_or_else(|| anyhow::anyhow!("AI service returned no answer"))?;
        serde_json::from_str(text.trim())
            .context("AI service answer is not a valid extraction result")
    }

    /// Send one base64 image plus an instruction; returns the base64 of
    /// the first inline image in the answer.
    pub(crate) fn edit_image(&self, base64_image: &str, instruction: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_data("image/png", base64_image),
                    Part::text(format!("Edite esta imagem: {instruction}")),
                ],
            }],
            generation_config: None,
        };

        let response = self.generate(IMAGE_MODEL, &request)?;
        response
            .first_inline_image()
            .map(|img| img.data.clone())
            .ok_or_else(|| anyhow::anyhow!("No image generated in response"))
    }
}

/// Mime type for a payload, with filename-based fallback for files whose
/// classification is too coarse.
pub(super) fn mime_for(file: &FilePayload) -> String {
    let name = file.name.to_lowercase();
    if name.ends_with(".pdf") {
        "application/pdf".into()
    } else if name.ends_with(".png") {
        "image/png".into()
    } else if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        "image/jpeg".into()
    } else if name.ends_with(".csv") || name.ends_with(".txt") {
        "text/plain".into()
    } else {
        file.mime_type.clone()
    }
}
