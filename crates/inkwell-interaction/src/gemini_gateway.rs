//! GeminiGateway - Direct REST API implementation of [`ModelGateway`].
//!
//! Drafts go to the configured "draft" model with a thinking budget; rewrites,
//! reviews and fact checks go to the faster model.

use async_trait::async_trait;
use inkwell_core::config::{DEFAULT_REWRITE_CONTEXT_CHARS, GatewayConfig};
use inkwell_core::gateway::{
    DraftRequest, GatewayError, ModelGateway, ReviewVerdict, RewriteRequest,
};
use inkwell_core::secret::SecretService;
use inkwell_infrastructure::SecretServiceImpl;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::prompts;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const FACT_CHECK_FALLBACK: &str = "Could not verify.";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    base_url: String,
    config: GatewayConfig,
    rewrite_context_chars: usize,
}

impl GeminiGateway {
    /// Creates a gateway with the provided API key.
    pub fn new(api_key: impl Into<String>, config: GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::transport(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            config,
            rewrite_context_chars: DEFAULT_REWRITE_CONTEXT_CHARS,
        })
    }

    /// Loads the API key from the environment or `secret.json`.
    ///
    /// A `model_name` in `secret.json` overrides both configured models.
    pub async fn try_from_env(config: GatewayConfig) -> Result<Self, GatewayError> {
        let service = SecretServiceImpl::new(None).map_err(|e| {
            GatewayError::MissingCredential(format!("Failed to initialize SecretService: {e}"))
        })?;
        Self::try_from_secrets(&service, config).await
    }

    pub async fn try_from_secrets(
        service: &dyn SecretService,
        mut config: GatewayConfig,
    ) -> Result<Self, GatewayError> {
        let secrets = service
            .load_secrets()
            .await
            .map_err(GatewayError::MissingCredential)?;
        let gemini = secrets.gemini.ok_or_else(|| {
            GatewayError::MissingCredential("Gemini configuration not found".to_string())
        })?;

        if let Some(model) = gemini.model_name {
            config.draft_model = model.clone();
            config.fast_model = model;
        }
        Self::new(gemini.api_key, config)
    }

    /// Points the gateway at another endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets how many trailing chars of the document a rewrite sends.
    pub fn with_rewrite_context_chars(mut self, chars: usize) -> Self {
        self.rewrite_context_chars = chars;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Checks a claim with the Google Search tool.
    pub async fn fact_check(&self, query: &str) -> Result<FactCheck, GatewayError> {
        let request = GenerateContentRequest {
            tools: Some(vec![json!({ "googleSearch": {} })]),
            ..GenerateContentRequest::user_text(vec![query.to_string()])
        };
        let response = self.send_request(&self.config.fast_model, &request).await?;

        let sources = response
            .candidates
            .as_deref()
            .and_then(<[Candidate]>::first)
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(FactCheck {
            text: extract_text(&response).unwrap_or_else(|| FACT_CHECK_FALLBACK.to_string()),
            sources,
        })
    }

    async fn try_review(&self, paragraph: &str) -> Result<ReviewVerdict, GatewayError> {
        let request = GenerateContentRequest {
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(review_schema()),
                thinking_config: None,
            }),
            ..GenerateContentRequest::user_text(vec![prompts::review_prompt(paragraph)])
        };
        let response = self.send_request(&self.config.fast_model, &request).await?;

        match extract_text(&response) {
            Some(text) => decode_review(&text),
            None => Ok(ReviewVerdict::no_suggestion()),
        }
    }

    async fn send_request(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!("{}/{model}:generateContent", self.base_url);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::transport(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response
            .json()
            .await
            .map_err(|err| GatewayError::decode(format!("Failed to parse Gemini response: {err}")))
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_draft(&self, request: DraftRequest) -> Result<String, GatewayError> {
        let blocks = prompts::draft_blocks(&request.prompt, request.context.as_deref(), &request.files);
        let body = GenerateContentRequest {
            system_instruction: Some(Content::system(prompts::WRITER_SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                }),
                ..GenerationConfig::default()
            }),
            ..GenerateContentRequest::user_text(blocks)
        };

        let response = self
            .send_request(&self.config.draft_model, &body)
            .await
            .inspect_err(|err| tracing::error!("[Gateway] Draft generation failed: {err}"))?;
        Ok(extract_text(&response).unwrap_or_default())
    }

    async fn rewrite(&self, request: RewriteRequest) -> Result<String, GatewayError> {
        let prompt = prompts::rewrite_prompt(
            &request.selection,
            &request.instruction,
            &request.context,
            self.rewrite_context_chars,
        );
        let body = GenerateContentRequest {
            system_instruction: Some(Content::system(prompts::REWRITE_SYSTEM_INSTRUCTION)),
            ..GenerateContentRequest::user_text(vec![prompt])
        };

        let response = self
            .send_request(&self.config.fast_model, &body)
            .await
            .inspect_err(|err| tracing::error!("[Gateway] Inline rewrite failed: {err}"))?;
        Ok(extract_text(&response)
            .filter(|text| !text.is_empty())
            .unwrap_or(request.selection))
    }

    async fn review(&self, paragraph: &str) -> ReviewVerdict {
        self.try_review(paragraph).await.unwrap_or_else(|err| {
            tracing::warn!("[Gateway] Review failed, treating as no suggestion: {err}");
            ReviewVerdict::no_suggestion()
        })
    }
}

/// Decodes a structured review, enforcing the response schema.
///
/// `hasSuggestion` must be present and boolean; `explanation` and
/// `suggestion` must be strings when present.
pub fn decode_review(text: &str) -> Result<ReviewVerdict, GatewayError> {
    serde_json::from_str(text.trim())
        .map_err(|err| GatewayError::decode(format!("Review response does not match schema: {err}")))
}

fn review_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hasSuggestion": { "type": "BOOLEAN" },
            "explanation": { "type": "STRING" },
            "suggestion": { "type": "STRING" }
        },
        "required": ["hasSuggestion"]
    })
}

/// Result of [`GeminiGateway::fact_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCheck {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// A web page the model cited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroundingSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

impl GenerateContentRequest {
    fn user_text(blocks: Vec<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: blocks.into_iter().map(|text| Part { text }).collect(),
            }],
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<GroundingSource>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the non-thought text parts of the first candidate.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = &response.candidates.as_ref()?.first()?.content.as_ref()?.parts;
    let text: String = parts
        .iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect();
    (!text.is_empty()).then_some(text)
}

fn map_http_error(status: StatusCode, body: String) -> GatewayError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GatewayError::Http {
        status: status.as_u16(),
        message,
        retryable,
    }
}
