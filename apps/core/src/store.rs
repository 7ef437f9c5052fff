//! In-memory story store and the JSON story file loader.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::actors::traits::StoryStore;
use crate::assistant::{BulkField, PendingOperation};
use crate::error::AppError;
use crate::models::{Level, Story, StoryStatus};

/// Loads a JSON array of stories from `path`.
#[instrument]
pub async fn load_stories(path: &Path) -> Result<Vec<Story>, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let stories: Vec<Story> = serde_json::from_str(&raw)?;
    ensure_unique_ids(&stories)?;
    info!(count = stories.len(), "Loaded stories");
    Ok(stories)
}

/// Rejects collections where two stories share an id.
pub fn ensure_unique_ids(stories: &[Story]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(stories.len());
    for story in stories {
        if !seen.insert(story.id.as_str()) {
            return Err(AppError::Validation(format!("Duplicate story id: {}", story.id)));
        }
    }
    Ok(())
}

/// Canonical value a bulk operation writes.
#[derive(Debug, Clone, Copy)]
enum FieldValue {
    Level(Level),
    Status(StoryStatus),
}

fn parse_field_value(field: BulkField, value: &str) -> Result<FieldValue, AppError> {
    let parsed = match field {
        BulkField::Priority | BulkField::Effort => Level::from_literal(value).map(FieldValue::Level),
        BulkField::Status => StoryStatus::from_literal(value).map(FieldValue::Status),
    };
    parsed.ok_or_else(|| {
        AppError::Validation(format!(
            "\"{}\" is not a valid {} value",
            value,
            field.key()
        ))
    })
}

/// Story collection guarded by an async read/write lock.
pub struct InMemoryStoryStore {
    stories: RwLock<Vec<Story>>,
}

impl InMemoryStoryStore {
    pub fn new(stories: Vec<Story>) -> Result<Self, AppError> {
        ensure_unique_ids(&stories)?;
        Ok(Self {
            stories: RwLock::new(stories),
        })
    }

    pub async fn get(&self, id: &str) -> Result<Story, AppError> {
        self.stories
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("story {}", id)))
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn snapshot(&self) -> Result<Vec<Story>, AppError> {
        Ok(self.stories.read().await.clone())
    }

    async fn apply(&self, operation: &PendingOperation) -> Result<usize, AppError> {
        if let Some(change) = operation.changes.iter().find(|c| c.field != operation.field) {
            return Err(AppError::Validation(format!(
                "Change for {} targets {} inside a {} operation",
                change.id,
                change.field.key(),
                operation.field.key()
            )));
        }
        // Validate before taking the write lock so a bad value writes nothing.
        let value = parse_field_value(operation.field, &operation.new_value)?;
        let ids: HashSet<&str> = operation.changes.iter().map(|c| c.id.as_str()).collect();

        let mut stories = self.stories.write().await;
        let mut updated = 0;
        for story in stories.iter_mut().filter(|s| ids.contains(s.id.as_str())) {
            match (operation.field, value) {
                (BulkField::Priority, FieldValue::Level(level)) => story.priority = level,
                (BulkField::Effort, FieldValue::Level(level)) => story.effort = level,
                (BulkField::Status, FieldValue::Status(status)) => story.status = status,
                _ => continue,
            }
            updated += 1;
        }
        Ok(updated)
    }
}
