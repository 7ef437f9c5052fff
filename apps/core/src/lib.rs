//! StoryAssist core: a simulated chat assistant over a user-story workspace.

pub mod actors;
pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
mod tests;

pub use actors::supervisor::ChatSupervisorHandle;
pub use config::ChatConfig;
pub use error::AppError;
pub use store::{load_stories, InMemoryStoryStore};
