use serde::Deserialize;
use talker_db::models::Sentiment;
use tracing::warn;

/// Parsed sentiment judgment from the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentJudgment {
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// Outcome of the sentiment stage. `Fallback` is a value, not an error:
/// the pipeline substitutes neutral/0.0 and keeps going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SentimentOutcome {
    Classified(SentimentJudgment),
    Fallback,
}

impl SentimentOutcome {
    /// The values that end up in the row and the response.
    pub fn into_judgment(self) -> SentimentJudgment {
        match self {
            SentimentOutcome::Classified(judgment) => judgment,
            SentimentOutcome::Fallback => SentimentJudgment {
                sentiment: Sentiment::Neutral,
                confidence: 0.0,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawJudgment {
    sentiment: String,
    confidence: f64,
}

/// Parse the model's reply into a typed judgment.
///
/// Anything that is not a JSON object carrying a known label (any casing)
/// and a confidence within [0, 1] falls back.
pub fn parse_reply(raw: &str) -> SentimentOutcome {
    let parsed: RawJudgment = match serde_json::from_str(raw.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "unparsable sentiment reply, falling back to neutral");
            return SentimentOutcome::Fallback;
        }
    };

    let sentiment = match parsed.sentiment.to_lowercase().as_str() {
        "angry" => Sentiment::Angry,
        "sad" => Sentiment::Sad,
        "happy" => Sentiment::Happy,
        "neutral" => Sentiment::Neutral,
        "excited" => Sentiment::Excited,
        "fearful" => Sentiment::Fearful,
        other => {
            warn!(label = other, "unknown sentiment label, falling back to neutral");
            return SentimentOutcome::Fallback;
        }
    };

    if !(0.0..=1.0).contains(&parsed.confidence) {
        warn!(
            confidence = parsed.confidence,
            "sentiment confidence out of range, falling back to neutral"
        );
        return SentimentOutcome::Fallback;
    }

    SentimentOutcome::Classified(SentimentJudgment {
        sentiment,
        confidence: parsed.confidence,
    })
}
