use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse emotional classification of a transcription. Serialized
/// lowercase everywhere (table column and API response alike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Angry,
    Sad,
    Happy,
    #[default]
    Neutral,
    Excited,
    Fearful,
}

/// Row to insert into the `Transcriptions` table. `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewTranscription {
    pub transcription: String,
    pub topic: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub transcription: String,
    pub topic: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

impl TranscriptionRow {
    pub const TABLE: &'static str = "Transcriptions";
}
