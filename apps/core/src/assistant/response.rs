//! Response structures returned by the chat service.
//!
//! Everything here is created fresh per request. JSON uses camelCase keys so
//! the presentation layer can render it directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Story, StorySummary};

use super::normalize::normalize;
use super::synonyms::{lookup, EFFORT_SYNONYMS, PRIORITY_SYNONYMS, STATUS_SYNONYMS};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// How the presentation layer renders a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    BulkPreview,
    QueryResult,
    SuggestionChips,
}

/// Story field a bulk operation writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkField {
    Priority,
    Status,
    Effort,
}

impl BulkField {
    pub fn key(&self) -> &'static str {
        match self {
            BulkField::Priority => "priority",
            BulkField::Status => "status",
            BulkField::Effort => "effort",
        }
    }

    /// German field name for messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            BulkField::Priority => "Priorität",
            BulkField::Status => "Status",
            BulkField::Effort => "Aufwand",
        }
    }

    /// The story's current value as its canonical literal.
    pub fn current_value(&self, story: &Story) -> &'static str {
        match self {
            BulkField::Priority => story.priority.label(),
            BulkField::Status => story.status.label(),
            BulkField::Effort => story.effort.label(),
        }
    }

    /// Maps a spoken value onto the field's canonical literal, or returns it
    /// unchanged when no synonym matches.
    pub fn resolve_value(&self, raw: &str) -> String {
        let key = normalize(raw);
        let canonical = match self {
            BulkField::Priority => lookup(PRIORITY_SYNONYMS, &key).map(|l| l.label()),
            BulkField::Status => lookup(STATUS_SYNONYMS, &key).map(|s| s.label()),
            BulkField::Effort => lookup(EFFORT_SYNONYMS, &key).map(|l| l.label()),
        };
        canonical.map(str::to_string).unwrap_or_else(|| raw.to_string())
    }
}

/// One proposed field edit on one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkChange {
    pub id: String,
    pub title: String,
    pub field: BulkField,
    pub old_value: String,
    pub new_value: String,
}

/// An uncommitted batch of bulk changes awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOperation {
    pub field: BulkField,
    pub new_value: String,
    pub changes: Vec<BulkChange>,
}

/// Structured data attached to a non-text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePayload {
    BulkPreview {
        field: BulkField,
        #[serde(rename = "newValue")]
        new_value: String,
        changes: Vec<BulkChange>,
    },
    QueryResult {
        items: Vec<StorySummary>,
        total: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },
    SuggestionChips {
        chips: Vec<String>,
    },
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessagePayload>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn assistant(kind: MessageKind, content: String, metadata: Option<MessagePayload>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            kind,
            content,
            metadata,
            timestamp: Utc::now(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::assistant(MessageKind::Text, content.into(), None)
    }

    pub fn bulk_preview(content: impl Into<String>, operation: &PendingOperation) -> Self {
        Self::assistant(
            MessageKind::BulkPreview,
            content.into(),
            Some(MessagePayload::BulkPreview {
                field: operation.field,
                new_value: operation.new_value.clone(),
                changes: operation.changes.clone(),
            }),
        )
    }

    pub fn query_result(content: impl Into<String>, stories: &[&Story], summary: Option<String>) -> Self {
        let items: Vec<StorySummary> = stories.iter().map(|s| StorySummary::from(*s)).collect();
        Self::assistant(
            MessageKind::QueryResult,
            content.into(),
            Some(MessagePayload::QueryResult {
                total: items.len(),
                items,
                summary,
            }),
        )
    }

    pub fn suggestion_chips(content: impl Into<String>, chips: &[&str]) -> Self {
        Self::assistant(
            MessageKind::SuggestionChips,
            content.into(),
            Some(MessagePayload::SuggestionChips {
                chips: chips.iter().map(|c| c.to_string()).collect(),
            }),
        )
    }
}

/// Everything the assistant answers to one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_operation: Option<PendingOperation>,
}

impl Response {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            pending_operation: None,
        }
    }

    /// Single plain-text answer.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::text(content)])
    }

    pub fn with_pending(mut self, operation: PendingOperation) -> Self {
        self.pending_operation = Some(operation);
        self
    }

    /// Messages of the given kind, in order.
    pub fn messages_of(&self, kind: MessageKind) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(move |m| m.kind == kind)
    }
}
