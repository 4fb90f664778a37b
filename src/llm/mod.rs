mod gemini;
mod openai;

use crate::types::{AspectRatio, ImageSize};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Response parsing failed: {0}")]
    ParseError(String),

    /// The provider does not know the project behind the key (billing not set up)
    #[error("KEY_NOT_FOUND")]
    KeyNotFound,

    #[error("Provider {0} does not support this request")]
    Unsupported(String),
}

/// Request to generate text
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Instructions that frame the prompt
    pub system: Option<String>,
    /// The prompt text
    pub prompt: String,
    /// Ask the provider for a JSON-only answer where it supports that
    pub expect_json: bool,
    /// Maximum response length in tokens (provider-dependent)
    pub max_tokens: Option<u32>,
    /// Timeout for the request
    pub timeout: Duration,
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// The generated text
    pub text: String,
    /// Provider-specific metadata (model used, tokens consumed, etc.)
    pub metadata: ResponseMetadata,
}

/// Request to generate a single image
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub aspect_ratio: AspectRatio,
    pub timeout: Duration,
}

/// A generated image
#[derive(Debug, Clone)]
pub struct ImageResponse {
    /// `data:<mime>;base64,<payload>`
    pub data_uri: String,
    pub metadata: ResponseMetadata,
}

/// Metadata about the LLM response
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Name of the provider (e.g., "gemini", "openai")
    pub provider: String,
    /// Model name used
    pub model: String,
    /// Tokens consumed (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers must implement
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for the given prompt
    async fn generate(&self, request: GenerateRequest) -> LlmResult<GenerateResponse>;

    /// Generate one image for the given prompt
    async fn generate_image(&self, _request: ImageRequest) -> LlmResult<ImageResponse> {
        Err(LlmError::Unsupported(self.name().to_string()))
    }

    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Whether this provider can produce images
    fn supports_images(&self) -> bool {
        false
    }
}

/// Manager for the configured LLM providers
pub struct LlmManager {
    pub providers: Vec<Box<dyn LlmProvider>>,
    pub config: LlmConfig,
}

impl LlmManager {
    /// Create a new LLM manager with the given providers
    pub fn new(providers: Vec<Box<dyn LlmProvider>>, config: LlmConfig) -> Self {
        Self { providers, config }
    }

    /// The provider used for text requests (the first configured one)
    pub fn text_provider(&self) -> LlmResult<&dyn LlmProvider> {
        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or_else(|| LlmError::ConfigError("No LLM provider configured".to_string()))
    }

    /// The provider used for image requests
    pub fn image_provider(&self) -> LlmResult<&dyn LlmProvider> {
        self.providers
            .iter()
            .find(|p| p.supports_images())
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                LlmError::ConfigError("No image-capable provider configured".to_string())
            })
    }

    /// Ask the text provider for a fresh word pack. Single attempt, no retries.
    pub async fn generate_word_pack(&self) -> LlmResult<Vec<GeneratedPair>> {
        let provider = self.text_provider()?;
        generate_word_pack(provider, &self.config).await
    }

    /// Generate one image with the image provider. Single attempt, no retries.
    pub async fn generate_image(
        &self,
        prompt: String,
        size: ImageSize,
        aspect_ratio: AspectRatio,
    ) -> LlmResult<ImageResponse> {
        let provider = self.image_provider()?;
        let request = ImageRequest {
            prompt,
            size,
            aspect_ratio,
            timeout: self.config.image_timeout,
        };

        let response = provider.generate_image(request).await?;
        tracing::info!(
            "Image generated by {}:{} in {}ms",
            response.metadata.provider,
            response.metadata.model,
            response.metadata.latency_ms
        );
        Ok(response)
    }
}

/// Configuration for LLM providers
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Gemini model for word packs
    pub gemini_model: String,
    /// Gemini model for images
    pub gemini_image_model: String,
    /// Gemini REST endpoint
    pub gemini_base_url: String,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// OpenAI model to use
    pub openai_model: String,
    /// Default timeout for text requests
    pub default_timeout: Duration,
    /// Timeout for image requests (these are slow)
    pub image_timeout: Duration,
    /// Default max tokens for responses
    pub default_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-3-flash-preview".to_string(),
            gemini_image_model: "gemini-3-pro-image-preview".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            default_timeout: Duration::from_secs(30),
            image_timeout: Duration::from_secs(120),
            default_max_tokens: 1024,
        }
    }
}

/// Read a trimmed, non-empty environment variable
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            // API_KEY is accepted as a fallback name
            gemini_api_key: env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY")),
            gemini_model: env_non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_image_model: env_non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or(defaults.gemini_image_model),
            gemini_base_url: env_non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            openai_api_key: env_non_empty("OPENAI_API_KEY"),
            openai_model: env_non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            default_timeout: env_non_empty("LLM_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_timeout),
            image_timeout: env_non_empty("LLM_IMAGE_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.image_timeout),
            default_max_tokens: env_non_empty("LLM_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_max_tokens),
        }
    }

    /// Build an LlmManager with all configured providers
    pub fn build_manager(&self) -> LlmResult<LlmManager> {
        let mut providers: Vec<Box<dyn LlmProvider>> = Vec::new();

        if let Some(api_key) = &self.gemini_api_key {
            providers.push(Box::new(GeminiProvider::new(
                api_key.clone(),
                self.gemini_base_url.clone(),
                self.gemini_model.clone(),
                self.gemini_image_model.clone(),
            )?));
        }

        if let Some(api_key) = &self.openai_api_key {
            providers.push(Box::new(OpenAiProvider::new(
                api_key.clone(),
                self.openai_model.clone(),
            )));
        }

        if providers.is_empty() {
            return Err(LlmError::ConfigError(
                "No LLM providers configured. Set GEMINI_API_KEY or OPENAI_API_KEY".to_string(),
            ));
        }

        Ok(LlmManager::new(providers, self.clone()))
    }
}

/// A word/hint pair as produced by a generator, before it gets an id
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedPair {
    pub word: String,
    pub hint: String,
}

const WORD_PACK_SYSTEM_PROMPT: &str = "You write content for the party game 'The Impostor'. \
    Answer with JSON only, no explanations.";

const WORD_PACK_PROMPT: &str = "Generate 5 word and hint pairs for the game 'The Impostor'. \
    The 'word' is the secret object. The 'hint' is a vague but useful description that only the impostor sees. \
    The impostor must be able to pretend to know the word using the hint. \
    Example: Word: 'Pizza', Hint: 'Popular round food'. \
    Avoid overly complex words. \
    Return only a JSON array of objects with the string fields \"word\" and \"hint\".";

/// Ask a provider for a word pack and parse the answer
pub async fn generate_word_pack(
    provider: &dyn LlmProvider,
    config: &LlmConfig,
) -> LlmResult<Vec<GeneratedPair>> {
    let request = GenerateRequest {
        system: Some(WORD_PACK_SYSTEM_PROMPT.to_string()),
        prompt: WORD_PACK_PROMPT.to_string(),
        expect_json: true,
        max_tokens: Some(config.default_max_tokens),
        timeout: config.default_timeout,
    };

    let response = provider.generate(request).await?;
    tracing::info!(
        "Word pack generated by {}:{} in {}ms ({:?} tokens)",
        response.metadata.provider,
        response.metadata.model,
        response.metadata.latency_ms,
        response.metadata.tokens_used
    );

    parse_word_pack(&response.text)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordPackPayload {
    List(Vec<GeneratedPair>),
    Wrapped { pairs: Vec<GeneratedPair> },
}

/// Parse a generator answer into trimmed pairs.
///
/// Accepts a bare array or `{"pairs": [...]}`, optionally inside a markdown
/// code fence. Entries with a blank word or hint are dropped; nothing usable
/// left is an error.
pub fn parse_word_pack(text: &str) -> LlmResult<Vec<GeneratedPair>> {
    let body = strip_code_fence(text);

    let payload: WordPackPayload =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError(e.to_string()))?;
    let pairs = match payload {
        WordPackPayload::List(pairs) | WordPackPayload::Wrapped { pairs } => pairs,
    };

    let total = pairs.len();
    let pairs: Vec<GeneratedPair> = pairs
        .into_iter()
        .map(|p| GeneratedPair {
            word: p.word.trim().to_string(),
            hint: p.hint.trim().to_string(),
        })
        .filter(|p| !p.word.is_empty() && !p.hint.is_empty())
        .collect();

    if pairs.len() < total {
        tracing::warn!("Dropped {} blank generated pairs", total - pairs.len());
    }
    if pairs.is_empty() {
        return Err(LlmError::ParseError(
            "No usable word pairs in response".to_string(),
        ));
    }
    Ok(pairs)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
