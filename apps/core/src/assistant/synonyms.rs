//! Synonym tables mapping German/English phrasings onto canonical literals.
//!
//! Keys are stored in normalized form (see [`super::normalize`]). Tables are
//! ordered: multi-word keys come before their single-word tails so that
//! "in review" is found before "review".

use crate::models::{Level, StoryStatus};

/// An ordered `(normalized key, canonical value)` table.
pub type SynonymTable<T> = &'static [(&'static str, T)];

pub const STATUS_SYNONYMS: SynonymTable<StoryStatus> = &[
    ("in bearbeitung", StoryStatus::InProgress),
    ("in progress", StoryStatus::InProgress),
    ("in arbeit", StoryStatus::InProgress),
    ("in review", StoryStatus::InReview),
    ("im review", StoryStatus::InReview),
    ("in pruefung", StoryStatus::InReview),
    ("to do", StoryStatus::ToDo),
    ("todo", StoryStatus::ToDo),
    ("offen", StoryStatus::ToDo),
    ("entwuerfe", StoryStatus::Draft),
    ("entwurf", StoryStatus::Draft),
    ("draft", StoryStatus::Draft),
    ("genehmigt", StoryStatus::Approved),
    ("freigegeben", StoryStatus::Approved),
    ("approved", StoryStatus::Approved),
    ("abgeschlossen", StoryStatus::Done),
    ("erledigt", StoryStatus::Done),
    ("fertig", StoryStatus::Done),
    ("done", StoryStatus::Done),
    ("review", StoryStatus::InReview),
];

pub const PRIORITY_SYNONYMS: SynonymTable<Level> = &[
    ("hoch", Level::Hoch),
    ("hohe", Level::Hoch),
    ("high", Level::Hoch),
    ("mittel", Level::Mittel),
    ("medium", Level::Mittel),
    ("niedrig", Level::Niedrig),
    ("gering", Level::Niedrig),
    ("low", Level::Niedrig),
];

pub const EFFORT_SYNONYMS: SynonymTable<Level> = &[
    ("hoch", Level::Hoch),
    ("high", Level::Hoch),
    ("gross", Level::Hoch),
    ("mittel", Level::Mittel),
    ("medium", Level::Mittel),
    ("niedrig", Level::Niedrig),
    ("gering", Level::Niedrig),
    ("klein", Level::Niedrig),
    ("low", Level::Niedrig),
];

/// Returns the value of the first key contained anywhere in `normalized`.
pub fn find_in<T: Copy>(table: SynonymTable<T>, normalized: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|(_, value)| *value)
}

/// Returns the value whose key equals `normalized` (after trimming).
pub fn lookup<T: Copy>(table: SynonymTable<T>, normalized: &str) -> Option<T> {
    let needle = normalized.trim();
    table
        .iter()
        .find(|(key, _)| *key == needle)
        .map(|(_, value)| *value)
}
