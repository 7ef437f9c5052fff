//! # Assistant Module
//!
//! Simulated chat for the story workspace. Parses German free text into a
//! small set of operations and answers with structured responses.
//!
//! ## Components
//! - `normalize`: lowercase + umlaut folding used by every matcher
//! - `synonyms`: status/priority/effort synonym tables
//! - `intent`: ordered regex rules (fast path, no model)
//! - `filter`: status → priority → project → keyword cascade
//! - `response`: message and bulk-operation structures
//! - `builder`: one response builder per intent
//! - `service`: pipeline entry point with simulated thinking delay

pub mod builder;
pub mod filter;
pub mod intent;
pub mod normalize;
pub mod response;
pub mod service;
pub mod synonyms;

pub use filter::{filter_stories, FilterStage};
pub use intent::{Intent, IntentClassifier, IntentResult, IntentRule};
pub use normalize::normalize;
pub use response::{
    BulkChange, BulkField, ChatMessage, MessageKind, MessagePayload, PendingOperation, Response, Role,
};
pub use service::{ChatContext, SimulatedChatService};
