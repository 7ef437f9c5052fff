//! Test Module
//!
//! Scenario tests for the StoryAssist core. Unit tests live next to the code
//! they cover.
//!
//! ## Test Categories
//! - `fixtures`: shared story collections
//! - `chat_tests`: raw text in, structured response out
//! - `supervisor_tests`: pending operation lifecycle through the actor
