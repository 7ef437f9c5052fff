//! Entity filtering over an in-memory story collection.
//!
//! Narrowing runs as a cascade and the first non-empty stage wins:
//! status synonym, priority synonym, project substring, free-text keywords.

use crate::models::Story;

use super::normalize::{keywords, normalize};
use super::synonyms::{find_in, PRIORITY_SYNONYMS, STATUS_SYNONYMS};

/// Which cascade stage produced a filter result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Status,
    Priority,
    Project,
    Keywords,
    /// No usable keywords: the collection is returned unfiltered.
    Unfiltered,
}

/// Stories selected by [`filter_stories`] together with the stage that matched.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub stories: Vec<&'a Story>,
    pub stage: FilterStage,
}

/// Narrows `stories` by a free-text filter phrase.
pub fn filter_stories<'a>(phrase: &str, stories: &'a [Story]) -> Vec<&'a Story> {
    filter_with_stage(phrase, stories).stories
}

/// Same as [`filter_stories`], also reporting which stage matched.
pub fn filter_with_stage<'a>(phrase: &str, stories: &'a [Story]) -> FilterOutcome<'a> {
    let needle = normalize(phrase.trim());

    if let Some(status) = find_in(STATUS_SYNONYMS, &needle) {
        let hits: Vec<&Story> = stories.iter().filter(|s| s.status == status).collect();
        if !hits.is_empty() {
            return FilterOutcome { stories: hits, stage: FilterStage::Status };
        }
    }

    if let Some(priority) = find_in(PRIORITY_SYNONYMS, &needle) {
        let hits: Vec<&Story> = stories.iter().filter(|s| s.priority == priority).collect();
        if !hits.is_empty() {
            return FilterOutcome { stories: hits, stage: FilterStage::Priority };
        }
    }

    if !needle.is_empty() {
        let hits: Vec<&Story> = stories
            .iter()
            .filter(|s| normalize(&s.project).contains(&needle))
            .collect();
        if !hits.is_empty() {
            return FilterOutcome { stories: hits, stage: FilterStage::Project };
        }
    }

    let words = keywords(&needle);
    if words.is_empty() {
        return FilterOutcome {
            stories: stories.iter().collect(),
            stage: FilterStage::Unfiltered,
        };
    }

    let hits = stories
        .iter()
        .filter(|s| {
            let blob = normalize(&format!("{} {} {}", s.title, s.description, s.tags.join(" ")));
            words.iter().any(|w| blob.contains(w))
        })
        .collect();
    FilterOutcome { stories: hits, stage: FilterStage::Keywords }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, StoryStatus};
    use crate::tests::fixtures::story;

    #[test]
    fn test_status_match_beats_project_substring() {
        let stories = vec![
            story("S-1", "Checkout", StoryStatus::Done, Level::Mittel, "Shop"),
            story("S-2", "Archiv", StoryStatus::Draft, Level::Hoch, "Done Right Consulting"),
        ];
        let outcome = filter_with_stage("done", &stories);
        assert_eq!(outcome.stage, FilterStage::Status);
        let ids: Vec<&str> = outcome.stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S-1"]);
    }

    #[test]
    fn test_priority_synonym_match() {
        let stories = vec![
            story("S-1", "A", StoryStatus::Draft, Level::Hoch, "P"),
            story("S-2", "B", StoryStatus::Draft, Level::Niedrig, "P"),
        ];
        let outcome = filter_with_stage("high", &stories);
        assert_eq!(outcome.stage, FilterStage::Priority);
        assert_eq!(outcome.stories.len(), 1);
        assert_eq!(outcome.stories[0].id, "S-1");
    }

    #[test]
    fn test_unmatched_synonym_falls_through_to_project() {
        // "fertig" maps to Done but no story is Done.
        let stories = vec![story("S-1", "A", StoryStatus::Draft, Level::Mittel, "Fertigung 4.0")];
        let outcome = filter_with_stage("Fertigung", &stories);
        assert_eq!(outcome.stage, FilterStage::Project);
        assert_eq!(outcome.stories.len(), 1);
    }

    #[test]
    fn test_project_substring_with_umlauts() {
        let stories = vec![
            story("S-1", "A", StoryStatus::Draft, Level::Mittel, "Bürgerportal"),
            story("S-2", "B", StoryStatus::Draft, Level::Mittel, "Shop"),
        ];
        let hits = filter_stories("buergerportal", &stories);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "S-1");
    }

    #[test]
    fn test_keyword_or_match() {
        let mut a = story("S-1", "Login mit SSO", StoryStatus::Draft, Level::Mittel, "P");
        a.tags = vec!["auth".to_string()];
        let b = story("S-2", "Warenkorb", StoryStatus::Draft, Level::Mittel, "P");
        let c = story("S-3", "Export", StoryStatus::Draft, Level::Mittel, "P");
        let stories = vec![a, b, c];

        let outcome = filter_with_stage("auth warenkorb", &stories);
        assert_eq!(outcome.stage, FilterStage::Keywords);
        let ids: Vec<&str> = outcome.stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S-1", "S-2"]);
    }

    #[test]
    fn test_short_words_only_returns_everything() {
        let stories = vec![
            story("S-1", "A", StoryStatus::Draft, Level::Mittel, "P"),
            story("S-2", "B", StoryStatus::Done, Level::Hoch, "Q"),
        ];
        let outcome = filter_with_stage("zu im an", &stories);
        assert_eq!(outcome.stage, FilterStage::Unfiltered);
        assert_eq!(outcome.stories.len(), 2);

        assert_eq!(filter_stories("", &stories).len(), 2);
    }

    #[test]
    fn test_no_match_is_empty() {
        let stories = vec![story("S-1", "Login", StoryStatus::Draft, Level::Mittel, "Shop")];
        assert!(filter_stories("blockchain", &stories).is_empty());
    }
}
