use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyIntent {
    Accept,
    Decline,
    Unknown,
}

/// Turns a free-text reply into an intent. Production deployments back this
/// with a language model, so callers must never hold a shift lock across it.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> ReplyIntent;
}

/// Prefix matcher used when no model-backed classifier is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordIntentClassifier;

const ACCEPT_PREFIXES: [&str; 2] = ["yes", "accept"];
const DECLINE_PREFIXES: [&str; 2] = ["no", "decline"];

impl KeywordIntentClassifier {
    pub fn classify_text(message: &str) -> ReplyIntent {
        let normalized = message.trim().to_lowercase();
        if ACCEPT_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            return ReplyIntent::Accept;
        }
        if DECLINE_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            return ReplyIntent::Decline;
        }
        ReplyIntent::Unknown
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, message: &str) -> ReplyIntent {
        Self::classify_text(message)
    }
}
