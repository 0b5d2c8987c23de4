//! Answers time and date questions through the completion API.

use config::CompletionConfig;
use jiff::Zoned;

use crate::{completion::CompletionClient, intent::IntentDetector};

/// Outcome of the time path for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimeReply {
    /// Not a time question, or the API produced no usable answer.
    NoMatch,
    /// The completion API answered.
    Answered(String),
    /// The completion API failed, carries the apology sent to the client instead.
    Failed(String),
}

pub(crate) struct TimeResponder {
    detector: IntentDetector,
    client: CompletionClient,
    fallback_message: String,
}

impl TimeResponder {
    pub fn new(detector: IntentDetector, client: CompletionClient, config: &CompletionConfig) -> Self {
        Self {
            detector,
            client,
            fallback_message: config.fallback_message.clone(),
        }
    }

    pub async fn respond(&self, message: Option<&str>) -> TimeReply {
        let Some(message) = message.filter(|message| self.detector.is_time_query(Some(message))) else {
            return TimeReply::NoMatch;
        };

        let prompt = time_prompt(message, &Zoned::now());

        match self.client.complete(&prompt).await {
            Ok(Some(text)) => TimeReply::Answered(text),
            Ok(None) => {
                log::debug!("Completion API returned no usable text for a time query");
                TimeReply::NoMatch
            }
            Err(e) => {
                log::error!("Failed to answer time query: {e}");
                TimeReply::Failed(self.fallback_message.clone())
            }
        }
    }
}

/// Builds the prompt sent for a time question, embedding the given instant.
pub(crate) fn time_prompt(message: &str, now: &Zoned) -> String {
    format!(
        "The user asked: \"{message}\". Give a friendly, concise response with the current time and date in the user's location. The current time is {}.",
        local_timestamp(now)
    )
}

/// Formats the instant the way a US-English locale prints a date and time.
pub(crate) fn local_timestamp(now: &Zoned) -> String {
    now.strftime("%-m/%-d/%Y, %-I:%M:%S %p %Z").to_string()
}
