use super::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Marker in the error body when the key's project cannot be found
const KEY_NOT_FOUND_MARKER: &str = "Requested entity was not found";

/// Google Gemini provider (REST, text and images)
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    image_model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        image_model: String,
    ) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;

        Ok(Self::with_client(client, api_key, base_url, model, image_model))
    }

    fn with_client(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        model: String,
        image_model: String,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            image_model,
            client,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// One request, bounded end to end (including the body read) by `timeout`
    async fn call(
        &self,
        model: &str,
        body: &GeminiRequest,
        timeout: Duration,
    ) -> LlmResult<GeminiResponse> {
        tokio::time::timeout(timeout, self.send(model, body))
            .await
            .map_err(|_| LlmError::Timeout(timeout))?
    }

    async fn send(&self, model: &str, body: &GeminiRequest) -> LlmResult<GeminiResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
    image_size: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .into_iter()
            .flat_map(|c| c.content.parts.iter())
    }

    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// First inline image as a data URI
    fn image_data_uri(&self) -> LlmResult<String> {
        let inline = self
            .parts()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or_else(|| LlmError::ParseError("No image in response".to_string()))?;

        STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| LlmError::ParseError(format!("Invalid image data: {}", e)))?;

        Ok(format!("data:{};base64,{}", inline.mime_type, inline.data))
    }
}

fn classify_failure(status: u16, body: &str) -> LlmError {
    if body.contains(KEY_NOT_FOUND_MARKER) {
        LlmError::KeyNotFound
    } else if status == 429 {
        LlmError::RateLimit
    } else {
        LlmError::ApiError(format!("Gemini API returned status {}: {}", status, body))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: GenerateRequest) -> LlmResult<GenerateResponse> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![Content::text(&request.prompt)],
            system_instruction: request.system.as_deref().map(Content::text),
            generation_config: Some(GenerationConfig {
                max_output_tokens: request.max_tokens,
                response_mime_type: request.expect_json.then_some("application/json"),
                image_config: None,
            }),
        };

        let response = self.call(&self.model, &body, request.timeout).await?;
        let text = response
            .text()
            .ok_or_else(|| LlmError::ParseError("No content in response".to_string()))?;

        Ok(GenerateResponse {
            text: text.trim().to_string(),
            metadata: ResponseMetadata {
                provider: "gemini".to_string(),
                model: self.model.clone(),
                tokens_used: response.usage_metadata.and_then(|u| u.total_token_count),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    async fn generate_image(&self, request: ImageRequest) -> LlmResult<ImageResponse> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![Content::text(&request.prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str(),
                    image_size: request.size.as_str(),
                }),
                ..Default::default()
            }),
        };

        let response = self
            .call(&self.image_model, &body, request.timeout)
            .await?;
        let data_uri = response.image_data_uri()?;

        Ok(ImageResponse {
            data_uri,
            metadata: ResponseMetadata {
                provider: "gemini".to_string(),
                model: self.image_model.clone(),
                tokens_used: response.usage_metadata.and_then(|u| u.total_token_count),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn supports_images(&self) -> bool {
        true
    }
}
