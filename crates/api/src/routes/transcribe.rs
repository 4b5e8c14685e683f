use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::info;

use crate::{error::ApiError, state::AppState};
use talker_db::DbError;
use talker_db::models::{NewTranscription, Sentiment, TranscriptionRow};

/// Content types the transcription provider accepts.
const ALLOWED_AUDIO_TYPES: [&str; 5] = [
    "audio/mpeg",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/x-pn-wav",
];

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcription_text: String,
    pub topic: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// `POST /transcribe` — the whole pipeline, strictly in order: validate,
/// buffer, transcribe, summarize topic, classify sentiment, persist.
///
/// Sentiment is the only degradable stage; every other failure aborts
/// the request with a stage-labelled error.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    // (filename, content_type, bytes)
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("audio").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        // Reject before buffering; no side effects for bad uploads.
        if !ALLOWED_AUDIO_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::InvalidFileType);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, content_type, bytes.to_vec()));
    }

    let (filename, content_type, audio) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let text = state
        .openai
        .transcribe(audio, filename, &content_type)
        .await
        .map_err(|e| ApiError::Transcription(e.to_string()))?;

    let topic = state
        .openai
        .summarize_topic(&text)
        .await
        .map_err(|e| ApiError::TopicSummarization(e.to_string()))?;

    let judgment = state.openai.classify_sentiment(&text).await.into_judgment();

    let stored = state
        .store
        .insert_transcription(&NewTranscription {
            transcription: text.clone(),
            topic: topic.clone(),
            sentiment: judgment.sentiment,
            confidence: judgment.confidence,
        })
        .await
        .map_err(|e| match e {
            DbError::EmptyInsert => ApiError::DatabaseInsertion(String::new()),
            other => ApiError::DatabaseInsertion(other.to_string()),
        })?;

    info!(id = stored.id, "stored transcription");

    Ok(Json(TranscribeResponse {
        transcription_text: text,
        topic,
        sentiment: judgment.sentiment,
        confidence: judgment.confidence,
    }))
}

/// `GET /transcriptions` — all rows, oldest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TranscriptionRow>>, ApiError> {
    let rows = state
        .store
        .list_transcriptions()
        .await
        .map_err(|e| ApiError::DatabaseQuery(e.to_string()))?;

    Ok(Json(rows))
}
