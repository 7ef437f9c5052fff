use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryType {
    Story,
    Epic,
    Bug,
    Task,
}

impl StoryType {
    pub fn label(&self) -> &'static str {
        match self {
            StoryType::Story => "Story",
            StoryType::Epic => "Epic",
            StoryType::Bug => "Bug",
            StoryType::Task => "Task",
        }
    }
}

/// Workflow status of a story. Serialized with the exact literals the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StoryStatus {
    Draft,
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Review")]
    InReview,
    #[serde(rename = "In Progress")]
    InProgress,
    Approved,
    Done,
}

impl StoryStatus {
    pub const ALL: [StoryStatus; 6] = [
        StoryStatus::Draft,
        StoryStatus::ToDo,
        StoryStatus::InReview,
        StoryStatus::InProgress,
        StoryStatus::Approved,
        StoryStatus::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "Draft",
            StoryStatus::ToDo => "To Do",
            StoryStatus::InReview => "In Review",
            StoryStatus::InProgress => "In Progress",
            StoryStatus::Approved => "Approved",
            StoryStatus::Done => "Done",
        }
    }

    /// Parses an exact canonical literal ("In Review", not "review").
    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == value)
    }
}

/// Three-step scale shared by priority and effort ("Hoch", "Mittel", "Niedrig").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Hoch,
    Mittel,
    Niedrig,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Hoch, Level::Mittel, Level::Niedrig];

    pub fn label(&self) -> &'static str {
        match self {
            Level::Hoch => "Hoch",
            Level::Mittel => "Mittel",
            Level::Niedrig => "Niedrig",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == value)
    }
}

/// Where a story came from. Provenance only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorySource {
    AiGenerated,
    JiraImport,
    Manual,
}

impl StorySource {
    pub const ALL: [StorySource; 3] = [
        StorySource::AiGenerated,
        StorySource::JiraImport,
        StorySource::Manual,
    ];

    /// German display name used in result summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            StorySource::AiGenerated => "KI-generiert",
            StorySource::JiraImport => "Jira-Import",
            StorySource::Manual => "manuell",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_display_via_label!(StoryType, StoryStatus, Level);

/// A unit of work: user story, epic, bug or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique within a collection, assigned externally.
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub story_type: StoryType,
    pub status: StoryStatus,
    pub priority: Level,
    pub effort: Level,
    pub project: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: StorySource,
    /// "Als <role> ..." part of the story template.
    #[serde(default)]
    pub role: String,
    /// "... möchte ich <goal> ..." part of the story template.
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub benefit: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Compliance check result in percent, if the story has been checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<f64>,
}

/// Reduced story shape rendered in result tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub story_type: StoryType,
    pub status: StoryStatus,
    pub priority: Level,
    pub project: String,
    pub effort: Level,
    pub source: StorySource,
}

impl From<&Story> for StorySummary {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            story_type: story.story_type,
            status: story.status,
            priority: story.priority,
            project: story.project.clone(),
            effort: story.effort,
            source: story.source,
        }
    }
}
