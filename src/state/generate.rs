use super::AppState;
use crate::error::{GameError, GameResult};
use crate::llm::ImageResponse;
use crate::types::{AspectRatio, ImageSize, WordPair};

impl AppState {
    /// Ask the content provider for new pairs and append them to the library
    pub async fn generate_words(&self) -> GameResult<Vec<WordPair>> {
        let llm = self.llm.as_ref().ok_or_else(|| {
            GameError::ExternalGenerationFailure("No content provider configured".to_string())
        })?;

        let generated = match llm.generate_word_pack().await {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::warn!("Word generation failed: {}", e);
                return Err(e.into());
            }
        };

        self.library.append_generated(generated).await
    }

    /// Generate one image. Only one request may be outstanding at a time.
    pub async fn generate_image(
        &self,
        prompt: &str,
        size: ImageSize,
        aspect_ratio: AspectRatio,
    ) -> GameResult<ImageResponse> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GameError::EmptyPrompt);
        }

        let llm = self.llm.as_ref().ok_or(GameError::CredentialMissing)?;

        let _slot = self
            .image_slot
            .try_lock()
            .map_err(|_| GameError::GenerationInProgress)?;

        tracing::info!(
            "Generating {} image ({}) for prompt of {} chars",
            size.as_str(),
            aspect_ratio.as_str(),
            prompt.chars().count()
        );

        llm.generate_image(prompt.to_string(), size, aspect_ratio)
            .await
            .map_err(|e| {
                tracing::warn!("Image generation failed: {}", e);
                GameError::from(e)
            })
    }
}
