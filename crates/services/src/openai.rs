use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use talker_config::settings::OpenAiSettings;
use thiserror::Error;
use tracing::{debug, warn};

use crate::sentiment::{self, SentimentOutcome};

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("OpenAI API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for the two OpenAI endpoints the pipeline needs:
/// `/audio/transcriptions` and `/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiService {
    client: Client,
    api_base: String,
    api_key: String,
    transcription_model: String,
    completion_model: String,
}

impl OpenAiService {
    pub fn new(settings: &OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            transcription_model: settings.transcription_model.clone(),
            completion_model: settings.completion_model.clone(),
        }
    }

    /// Speech-to-text over the buffered upload. The original filename is
    /// forwarded with the part; the provider uses its extension as a
    /// format hint.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: String,
        content_type: &str,
    ) -> Result<String, OpenAiError> {
        debug!(bytes = audio.len(), model = %self.transcription_model, "transcription request");

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename)
            .mime_str(content_type)
            .map_err(|e| OpenAiError::InvalidRequest(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, body });
        }

        let transcription: TranscriptionResponse = response.json().await?;
        Ok(transcription.text)
    }

    /// ~10-word topic summary, low temperature for stability.
    pub async fn summarize_topic(&self, text: &str) -> Result<String, OpenAiError> {
        let reply = self
            .chat(
                "You are a helpful assistant that summarizes text.",
                format!(
                    "Summarize the main topic of this transcription in exactly 10 words:\n\n{}",
                    text
                ),
                20,
                0.3,
            )
            .await?;
        Ok(reply.trim().to_string())
    }

    /// Sentiment judgment at temperature zero. Every failure mode
    /// collapses into `SentimentOutcome::Fallback`; this call never fails
    /// the request.
    pub async fn classify_sentiment(&self, text: &str) -> SentimentOutcome {
        let prompt = format!(
            "Analyze the sentiment of this text. \
             Respond with JSON containing 'sentiment' from this list \
             (angry, sad, happy, neutral, excited, fearful) \
             and 'confidence' (a number between 0 and 1). \
             Text:\n\n{}",
            text
        );

        match self
            .chat("You are an AI that analyzes sentiment of text.", prompt, 20, 0.0)
            .await
        {
            Ok(reply) => sentiment::parse_reply(&reply),
            Err(e) => {
                warn!(error = %e, "sentiment call failed, falling back to neutral");
                SentimentOutcome::Fallback
            }
        }
    }

    async fn chat(
        &self,
        system: &str,
        user: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: &self.completion_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                OpenAiError::MalformedResponse("no choices in completion response".to_string())
            })
    }
}
