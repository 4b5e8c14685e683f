pub mod openai;
pub mod sentiment;

pub use openai::{OpenAiError, OpenAiService};
pub use sentiment::{SentimentJudgment, SentimentOutcome};
