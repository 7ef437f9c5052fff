//! Simulated chat service - the entry point of the assistant pipeline.
//!
//! text → [`IntentClassifier`] → builder (with [`super::filter`]) → [`Response`]

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::config::ChatConfig;
use crate::models::Story;

use super::builder::build_response;
use super::intent::{IntentClassifier, IntentResult};
use super::response::Response;

/// Snapshot the caller hands in with every message.
#[derive(Debug, Clone, Copy)]
pub struct ChatContext<'a> {
    pub stories: &'a [Story],
}

/// Answers chat messages against a story snapshot.
///
/// Holds no mutable state; concurrent calls are independent.
pub struct SimulatedChatService {
    classifier: IntentClassifier,
    config: ChatConfig,
}

impl Default for SimulatedChatService {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}

impl SimulatedChatService {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Classification step only.
    pub fn classify(&self, text: &str) -> IntentResult {
        self.classifier.classify(text)
    }

    /// Synchronous pipeline without the thinking delay.
    pub fn respond(&self, text: &str, stories: &[Story]) -> Response {
        let result = self.classifier.classify(text);
        info!(
            intent = %result.intent,
            rule = result.matched_rule.as_deref().unwrap_or("-"),
            "Classified chat message"
        );
        debug!(params = ?result.params, "Extracted parameters");

        let response = build_response(&result, stories);
        debug!(
            messages = response.messages.len(),
            pending = response.pending_operation.is_some(),
            "Built response"
        );
        response
    }

    /// Answers after a randomized delay that simulates thinking time.
    #[instrument(skip(self, context), fields(stories = context.stories.len()))]
    pub async fn process_message(&self, text: &str, context: ChatContext<'_>) -> Response {
        let delay = self.config.thinking_delay();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "Simulating thinking delay");
            sleep(delay).await;
        }
        self.respond(text, context.stories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::intent::Intent;
    use crate::assistant::response::{MessageKind, MessagePayload};
    use crate::tests::fixtures::sample_stories;
    use std::time::{Duration, Instant};

    /// Strips per-message ids and timestamps so responses can be compared.
    fn comparable(response: &Response) -> Vec<(MessageKind, String, Option<MessagePayload>)> {
        response
            .messages
            .iter()
            .map(|m| (m.kind, m.content.clone(), m.metadata.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_process_message_is_deterministic() {
        let service = SimulatedChatService::new(ChatConfig::instant());
        let stories = sample_stories();
        let context = ChatContext { stories: &stories };

        for text in [
            "Setze die Priorität aller Draft-Stories auf Hoch",
            "Gibt es Tickets zum Thema Login?",
            "Zeige alle Stories mit Status In Progress",
            "asdkjaslkdj",
        ] {
            let first = service.process_message(text, context).await;
            let second = service.process_message(text, context).await;
            assert_eq!(comparable(&first), comparable(&second), "text: {}", text);
            assert_eq!(first.pending_operation, second.pending_operation);
            assert_eq!(service.classify(text), service.classify(text));
        }
    }

    #[tokio::test]
    async fn test_input_is_not_mutated() {
        let service = SimulatedChatService::new(ChatConfig::instant());
        let stories = sample_stories();
        let before = stories.clone();

        let response = service
            .process_message(
                "Setze den Status aller Draft-Stories auf Done",
                ChatContext { stories: &stories },
            )
            .await;

        assert!(response.pending_operation.is_some());
        assert_eq!(stories, before);
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let config = ChatConfig {
            min_delay_ms: 30,
            max_delay_ms: 40,
            ..ChatConfig::default()
        };
        let service = SimulatedChatService::new(config);
        let stories = sample_stories();

        let start = Instant::now();
        service
            .process_message("hallo", ChatContext { stories: &stories })
            .await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let config = ChatConfig {
            min_delay_ms: 5,
            max_delay_ms: 20,
            ..ChatConfig::default()
        };
        let service = SimulatedChatService::new(config);
        let stories = sample_stories();
        let context = ChatContext { stories: &stories };

        let texts = ["Liste alle Tickets", "asdkjaslkdj", "Gibt es Tickets zum Thema Login?"];
        let responses =
            futures::future::join_all(texts.iter().map(|t| service.process_message(t, context))).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(service.classify(texts[0]).intent, Intent::ListEntities);
        assert_eq!(responses[0].messages_of(MessageKind::QueryResult).count(), 1);
        assert_eq!(responses[1].messages_of(MessageKind::SuggestionChips).count(), 1);
        assert_eq!(responses[2].messages_of(MessageKind::QueryResult).count(), 1);
    }
}
