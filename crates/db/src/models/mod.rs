pub mod transcription;

pub use transcription::{NewTranscription, Sentiment, TranscriptionRow};
