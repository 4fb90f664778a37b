//! HTTP API endpoints for the word manager, packs and generation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GameError;
use crate::packs;
use crate::state::export::LibraryExport;
use crate::state::AppState;
use crate::types::*;

/// Pack listing without the words
#[derive(Debug, Clone, Serialize)]
pub struct PackSummary {
    pub id: PackId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub word_count: usize,
}

impl From<&WordPack> for PackSummary {
    fn from(pack: &WordPack) -> Self {
        Self {
            id: pack.id.clone(),
            name: pack.name.clone(),
            description: pack.description.clone(),
            difficulty: pack.difficulty,
            word_count: pack.words.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordInput {
    pub word: String,
    pub hint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub prompt: String,
    #[serde(default)]
    pub size: ImageSize,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageOutput {
    pub data_uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutput {
    pub imported: usize,
}

#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    code: &'static str,
    msg: String,
}

fn status_for(err: &GameError) -> StatusCode {
    match err {
        GameError::NoWordsAvailable
        | GameError::InvalidRoundConfig(_)
        | GameError::InvalidWordPair(_)
        | GameError::EmptyPrompt => StatusCode::BAD_REQUEST,
        GameError::UnknownPlayer(_) | GameError::WordNotFound(_) => StatusCode::NOT_FOUND,
        GameError::InvalidAction { .. } | GameError::GenerationInProgress => StatusCode::CONFLICT,
        GameError::CredentialMissing => StatusCode::UNAUTHORIZED,
        GameError::ExternalGenerationFailure(_) => StatusCode::BAD_GATEWAY,
        GameError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET /api/packs
pub async fn list_packs() -> Json<Vec<PackSummary>> {
    Json(packs::official_packs().iter().map(PackSummary::from).collect())
}

/// GET /api/packs/{id}
pub async fn get_pack(Path(id): Path<PackId>) -> Response {
    match packs::find_pack(&id) {
        Some(pack) => Json(pack).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                code: "PACK_NOT_FOUND",
                msg: format!("Pack '{}' not found", id),
            }),
        )
            .into_response(),
    }
}

/// GET /api/words
pub async fn list_words(State(state): State<Arc<AppState>>) -> Json<Vec<WordPair>> {
    Json(state.library.words().await)
}

/// POST /api/words
pub async fn add_word(
    State(state): State<Arc<AppState>>,
    Json(input): Json<WordInput>,
) -> Result<(StatusCode, Json<Vec<WordPair>>), GameError> {
    let words = state.library.add(&input.word, &input.hint).await?;
    Ok((StatusCode::CREATED, Json(words)))
}

/// PUT /api/words/{id}
pub async fn update_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WordId>,
    Json(input): Json<WordInput>,
) -> Result<Json<Vec<WordPair>>, GameError> {
    let pair = WordPair {
        id,
        word: input.word,
        hint: input.hint,
    };
    Ok(Json(state.library.update(pair).await?))
}

/// DELETE /api/words/{id}
pub async fn delete_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WordId>,
) -> Result<Json<Vec<WordPair>>, GameError> {
    Ok(Json(state.library.delete(&id).await?))
}

/// POST /api/words/generate
///
/// Appends a provider-generated pack to the library and returns the new library.
pub async fn generate_words(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WordPair>>, GameError> {
    Ok(Json(state.generate_words().await?))
}

/// POST /api/images
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ImageInput>,
) -> Result<Json<ImageOutput>, GameError> {
    let image = state
        .generate_image(&input.prompt, input.size, input.aspect_ratio)
        .await?;
    Ok(Json(ImageOutput {
        data_uri: image.data_uri,
    }))
}

/// GET /api/library/export
pub async fn export_library(State(state): State<Arc<AppState>>) -> Json<LibraryExport> {
    Json(state.export_library().await)
}

/// POST /api/library/import
///
/// Replaces the whole library with the snapshot.
pub async fn import_library(
    State(state): State<Arc<AppState>>,
    Json(export): Json<LibraryExport>,
) -> Result<Json<ImportOutput>, GameError> {
    let imported = state.import_library(export).await.map_err(|e| {
        tracing::warn!("Library import rejected: {}", e);
        e
    })?;
    Ok(Json(ImportOutput { imported }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&GameError::EmptyPrompt), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&GameError::WordNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&GameError::GenerationInProgress),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&GameError::CredentialMissing),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&GameError::ExternalGenerationFailure("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_pack_summary_counts_words() {
        let pack = packs::find_pack("travel").unwrap();
        let summary = PackSummary::from(&pack);
        assert_eq!(summary.word_count, pack.words.len());
        assert_eq!(summary.id, "travel");
    }
}
