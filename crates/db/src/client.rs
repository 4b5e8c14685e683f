use reqwest::{Client, StatusCode};
use talker_config::Settings;
use thiserror::Error;
use tracing::debug;

use crate::models::{NewTranscription, TranscriptionRow};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("insert acknowledged with no representation")]
    EmptyInsert,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thin client for the Supabase PostgREST endpoint backing the
/// `Transcriptions` table.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.database.url, &settings.database.service_role_key)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TranscriptionRow::TABLE)
    }

    /// Insert one row and return the stored representation.
    ///
    /// PostgREST only echoes the row back when asked via `Prefer`; an
    /// empty representation means the insert did not happen.
    pub async fn insert_transcription(&self, row: &NewTranscription) -> DbResult<TranscriptionRow> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DbError::Api { status, body });
        }

        let mut rows: Vec<TranscriptionRow> = response.json().await?;
        match rows.pop() {
            Some(stored) => {
                debug!(id = stored.id, "inserted transcription row");
                Ok(stored)
            }
            None => Err(DbError::EmptyInsert),
        }
    }

    /// All rows, oldest first — the order the frontend renders them in.
    pub async fn list_transcriptions(&self) -> DbResult<Vec<TranscriptionRow>> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DbError::Api { status, body });
        }

        Ok(response.json().await?)
    }
}
