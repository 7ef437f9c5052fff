use crate::actors::messages::AppError;
use crate::assistant::PendingOperation;
use crate::models::Story;
use async_trait::async_trait;

/// Defines the public interface for the authoritative story collection.
///
/// The chat pipeline only ever reads snapshots; writes happen exclusively through
/// [`StoryStore::apply`] once the user has confirmed a bulk preview.
#[async_trait]
pub trait StoryStore: Send + Sync + 'static {
    /// Returns a copy of the current collection.
    async fn snapshot(&self) -> Result<Vec<Story>, AppError>;

    /// Writes a confirmed bulk operation and returns the number of stories updated.
    async fn apply(&self, operation: &PendingOperation) -> Result<usize, AppError>;
}
