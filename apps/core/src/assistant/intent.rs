//! Intent classification using regex patterns.
//!
//! Each supported phrasing is an [`IntentRule`]: a trigger predicate plus a
//! slot extractor. Rules are evaluated in a fixed priority order and the first
//! trigger that fires wins, because several patterns overlap (a bulk status
//! change also mentions "status", a listing also says "zeige ... stories").
//!
//! All patterns run against normalized text (lowercase, umlauts folded).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use super::normalize::normalize;

/// Parameter key for the filter phrase of bulk changes and listings.
pub const PARAM_FILTER: &str = "filter";
/// Parameter key for the target value of bulk changes.
pub const PARAM_VALUE: &str = "value";
/// Parameter key for the topic of a search.
pub const PARAM_TOPIC: &str = "topic";
/// Parameter key for the project name of a status summary.
pub const PARAM_PROJECT: &str = "project";

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Change the priority of every matching story
    BulkPriority,
    /// Change the status of every matching story
    BulkStatus,
    /// Change the effort of every matching story
    BulkEffort,
    /// Keyword search over story texts
    SearchTopic,
    /// Summary of one project
    ProjectStatus,
    /// List stories matching a filter
    ListEntities,
    /// Nothing matched
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns the wire label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::BulkPriority => "bulk_priority",
            Intent::BulkStatus => "bulk_status",
            Intent::BulkEffort => "bulk_effort",
            Intent::SearchTopic => "search_topic",
            Intent::ProjectStatus => "project_status",
            Intent::ListEntities => "list_entities",
            Intent::Unknown => "unknown",
        }
    }
}

/// Extracted slot values keyed by the `PARAM_*` constants.
pub type IntentParams = BTreeMap<String, String>;

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Extracted slots; a slot whose capture was empty holds `""`
    pub params: IntentParams,
    /// Name of the rule that fired
    pub matched_rule: Option<String>,
}

impl IntentResult {
    fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            params: IntentParams::new(),
            matched_rule: None,
        }
    }

    /// Returns the slot value, or `""` when the slot was never extracted.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or("")
    }
}

/// One named trigger/extractor pair.
pub struct IntentRule {
    pub name: &'static str,
    pub intent: Intent,
    /// Decides whether the rule applies to the normalized text
    pub trigger: fn(&str) -> bool,
    /// Pulls slot values out of the normalized text
    pub extract: fn(&str) -> IntentParams,
}

impl IntentRule {
    /// Applies the rule to already-normalized text.
    pub fn apply(&self, normalized: &str) -> Option<IntentResult> {
        if !(self.trigger)(normalized) {
            return None;
        }
        Some(IntentResult {
            intent: self.intent,
            params: (self.extract)(normalized),
            matched_rule: Some(self.name.to_string()),
        })
    }
}

// Compile patterns once at startup
// NOTE: expect() is acceptable here, the patterns are constants.

const BULK_VERBS: &str = r"(?:setze|setz|set|aendere|aender|change|stelle|stell)";
const BULK_ARTICLES: &str = r"(?:die|den|der|das|the)";

/// Shared bulk-change shape: verb, optional article, field keyword, optional
/// "von"/"aller", non-greedy filter, "auf"/"zu"/"nach", value.
fn bulk_pattern(keyword: &str, value: &str) -> Regex {
    let pattern = format!(
        r"\b{verbs}\s+(?:{articles}\s+)?(?:{keyword})\b\s*(?:(?:von|of|fuer|for)\s+)?(?:(?:aller|allen|alle|all)\s+)?(?P<filter>.*?)\s*\b(?:auf|zu|nach)\s+(?P<value>{value})",
        verbs = BULK_VERBS,
        articles = BULK_ARTICLES,
        keyword = keyword,
        value = value,
    );
    Regex::new(&pattern).expect("Invalid regex: bulk change pattern")
}

static BULK_PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| bulk_pattern(r"prioritaet|prioritaeten|prio|priority", r"[\w-]+"));

// Status literals can span words ("in review"), so the value capture is greedy.
static BULK_STATUS: LazyLock<Regex> = LazyLock::new(|| bulk_pattern(r"status", r".+"));

static BULK_EFFORT: LazyLock<Regex> =
    LazyLock::new(|| bulk_pattern(r"aufwand|effort|schaetzung", r"[\w-]+"));

static SEARCH_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:gibt es|haben wir|finde|such|suche|zeig|zeige)\b")
        .expect("Invalid regex: search verbs")
});

static ENTITY_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:tickets?|stories|story|anforderungen|requirements)\b")
        .expect("Invalid regex: entity nouns")
});

static TOPIC_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:thema|themen|ueber|bezueglich|betreffend|zum|zur)\b")
        .expect("Invalid regex: topic markers")
});

static TOPIC_THEMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bthema\b").expect("Invalid regex: thema keyword"));

static ENTITY_ABOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:tickets?|stories|anforderungen|requirements)\s+(?:ueber|zum|zur|zu|bezueglich)\b")
        .expect("Invalid regex: entities about")
});

static TOPIC_EXTRACTORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\bthema\s+(?P<slot>.+)$").expect("Invalid regex: topic after thema"),
        Regex::new(
            r"\b(?:ueber|bezueglich|betreffend|zum|zur|zu|fuer)\s+(?:(?:den|dem|die|das|der|einen|ein)\s+)?(?P<slot>.+)$",
        )
        .expect("Invalid regex: topic after preposition"),
    ]
});

static PROJECT_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:aktuelle[nrs]?\s+status|aktuelle[nrs]?\s+stand|stand|ueberblick|uebersicht|zusammenfassung|summary|overview)\b",
    )
    .expect("Invalid regex: project summary keywords")
});

static PROJECT_NOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:projekt|project)").expect("Invalid regex: project noun"));

static PROJECT_EXTRACTORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(?:projekte?s?|project)\s+(?P<slot>.+)$")
            .expect("Invalid regex: project after noun"),
        Regex::new(
            r"\b(?:von|vom|fuer|zu|zum|ueber|of|for)\s+(?:(?:dem|das|den|der)\s+)?(?P<slot>.+?)(?:\s+(?:projekt\w*|project))?$",
        )
        .expect("Invalid regex: project after preposition"),
    ]
});

static LISTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:zeige|zeig|liste|list|gib|welche)\b.*?\b(?:alle\s+)?(?:stories|story|tickets?|eintraege|anforderungen)\b",
    )
    .expect("Invalid regex: listing trigger")
});

static LISTING_EXTRACTORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(?:mit\s+)?(?:(?:dem|der)\s+)?(?:status|prioritaet|prio|priority)\s+(?P<slot>.+)$")
            .expect("Invalid regex: listing filter after field"),
        Regex::new(r"\bmit\s+(?P<slot>.+)$").expect("Invalid regex: listing filter after mit"),
        Regex::new(r"\bprojekt\s+(?P<slot>.+)$").expect("Invalid regex: listing filter after projekt"),
    ]
});

/// Trims whitespace, quotes and sentence punctuation from a capture.
fn clean_capture(raw: &str) -> String {
    raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '"' | '\'' | '„' | '“' | '”' | '‚' | '‘' | '’' | '?' | '!' | '.' | ',' | ':' | ';')
    })
    .to_string()
}

/// First non-empty `slot` capture across `extractors`, or `""`.
fn first_slot(extractors: &[Regex], text: &str) -> String {
    extractors
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.name("slot").map(|m| clean_capture(m.as_str())))
        .find(|slot| !slot.is_empty())
        .unwrap_or_default()
}

fn bulk_params(re: &Regex, text: &str) -> IntentParams {
    let mut params = IntentParams::new();
    let (filter, value) = match re.captures(text) {
        Some(caps) => (
            caps.name("filter").map(|m| clean_capture(m.as_str())).unwrap_or_default(),
            caps.name("value").map(|m| clean_capture(m.as_str())).unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };
    params.insert(PARAM_FILTER.to_string(), filter);
    params.insert(PARAM_VALUE.to_string(), value);
    params
}

fn single_param(key: &str, value: String) -> IntentParams {
    let mut params = IntentParams::new();
    params.insert(key.to_string(), value);
    params
}

fn is_topic_search(text: &str) -> bool {
    let verb = SEARCH_VERB.is_match(text);
    (verb && ENTITY_NOUN.is_match(text) && TOPIC_MARKER.is_match(text))
        || (verb && TOPIC_THEMA.is_match(text))
        || ENTITY_ABOUT.is_match(text)
}

fn is_project_status(text: &str) -> bool {
    PROJECT_SUMMARY.is_match(text) && PROJECT_NOUN.is_match(text)
}

/// The rule list in evaluation order.
pub static RULES: &[IntentRule] = &[
    IntentRule {
        name: "bulk_priority",
        intent: Intent::BulkPriority,
        trigger: |t| BULK_PRIORITY.is_match(t),
        extract: |t| bulk_params(&BULK_PRIORITY, t),
    },
    IntentRule {
        name: "bulk_status",
        intent: Intent::BulkStatus,
        trigger: |t| BULK_STATUS.is_match(t),
        extract: |t| bulk_params(&BULK_STATUS, t),
    },
    IntentRule {
        name: "bulk_effort",
        intent: Intent::BulkEffort,
        trigger: |t| BULK_EFFORT.is_match(t),
        extract: |t| bulk_params(&BULK_EFFORT, t),
    },
    IntentRule {
        name: "search_topic",
        intent: Intent::SearchTopic,
        trigger: is_topic_search,
        extract: |t| single_param(PARAM_TOPIC, first_slot(&TOPIC_EXTRACTORS, t)),
    },
    IntentRule {
        name: "project_status",
        intent: Intent::ProjectStatus,
        trigger: is_project_status,
        extract: |t| single_param(PARAM_PROJECT, first_slot(&PROJECT_EXTRACTORS, t)),
    },
    IntentRule {
        name: "list_entities",
        intent: Intent::ListEntities,
        trigger: |t| LISTING.is_match(t),
        extract: |t| single_param(PARAM_FILTER, first_slot(&LISTING_EXTRACTORS, t)),
    },
];

/// Intent classifier over an ordered rule list
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the built-in rules
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Classify raw user text. Empty or unmatched input yields [`Intent::Unknown`].
    pub fn classify(&self, text: &str) -> IntentResult {
        let normalized = normalize(text.trim());
        if normalized.is_empty() {
            return IntentResult::unknown();
        }

        self.rules
            .iter()
            .find_map(|rule| rule.apply(&normalized))
            .unwrap_or_else(IntentResult::unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> IntentResult {
        IntentClassifier::new().classify(text)
    }

    #[test]
    fn test_bulk_priority_detection() {
        let result = classify("Setze die Priorität aller Draft-Stories auf Hoch");
        assert_eq!(result.intent, Intent::BulkPriority);
        assert_eq!(result.param(PARAM_FILTER), "draft-stories");
        assert_eq!(result.param(PARAM_VALUE), "hoch");
        assert_eq!(result.matched_rule.as_deref(), Some("bulk_priority"));
    }

    #[test]
    fn test_bulk_status_keeps_multi_word_value() {
        let result = classify("Ändere den Status aller Entwürfe auf In Review.");
        assert_eq!(result.intent, Intent::BulkStatus);
        assert_eq!(result.param(PARAM_FILTER), "entwuerfe");
        assert_eq!(result.param(PARAM_VALUE), "in review");
    }

    #[test]
    fn test_bulk_effort_single_word_value() {
        let result = classify("Setze den Aufwand von Login Stories auf niedrig bitte");
        assert_eq!(result.intent, Intent::BulkEffort);
        assert_eq!(result.param(PARAM_FILTER), "login stories");
        assert_eq!(result.param(PARAM_VALUE), "niedrig");
    }

    #[test]
    fn test_bulk_without_filter_extracts_empty_filter() {
        let result = classify("Setze die Priorität auf Mittel");
        assert_eq!(result.intent, Intent::BulkPriority);
        assert_eq!(result.param(PARAM_FILTER), "");
        assert_eq!(result.param(PARAM_VALUE), "mittel");
    }

    #[test]
    fn test_topic_search_detection() {
        let result = classify("Gibt es Tickets zum Thema Blockchain?");
        assert_eq!(result.intent, Intent::SearchTopic);
        assert_eq!(result.param(PARAM_TOPIC), "blockchain");

        let result = classify("Finde Stories über den „Warenkorb“");
        assert_eq!(result.intent, Intent::SearchTopic);
        assert_eq!(result.param(PARAM_TOPIC), "warenkorb");

        let result = classify("Tickets zu Zahlungsabwicklung");
        assert_eq!(result.intent, Intent::SearchTopic);
        assert_eq!(result.param(PARAM_TOPIC), "zahlungsabwicklung");
    }

    #[test]
    fn test_project_status_detection() {
        let result = classify("Wie ist der aktuelle Status von Projekt Nonexistent Corp?");
        assert_eq!(result.intent, Intent::ProjectStatus);
        assert_eq!(result.param(PARAM_PROJECT), "nonexistent corp");

        let result = classify("Gib mir eine Übersicht über das Projekt E-Commerce Platform");
        assert_eq!(result.intent, Intent::ProjectStatus);
        assert_eq!(result.param(PARAM_PROJECT), "e-commerce platform");

        let result = classify("Zusammenfassung für Mobile Banking Projekt");
        assert_eq!(result.intent, Intent::ProjectStatus);
        assert_eq!(result.param(PARAM_PROJECT), "mobile banking");
    }

    #[test]
    fn test_listing_preserves_multi_word_status() {
        let result = classify("Zeige alle Stories mit Status In Progress");
        assert_eq!(result.intent, Intent::ListEntities);
        assert_eq!(result.param(PARAM_FILTER), "in progress");
    }

    #[test]
    fn test_listing_without_filter() {
        let result = classify("Liste alle Tickets");
        assert_eq!(result.intent, Intent::ListEntities);
        assert_eq!(result.param(PARAM_FILTER), "");
    }

    #[test]
    fn test_rule_order_bulk_status_before_listing() {
        // Mentions "status" and "stories" but is an imperative change.
        let result = classify("Setze den Status aller Stories mit Priorität hoch auf Done");
        assert_eq!(result.intent, Intent::BulkStatus);
        assert_eq!(result.param(PARAM_VALUE), "done");
    }

    #[test]
    fn test_unknown_detection() {
        for text in ["", "   ", "asdkjaslkdj", "Hallo zusammen"] {
            let result = classify(text);
            assert_eq!(result.intent, Intent::Unknown, "text: {:?}", text);
            assert!(result.params.is_empty());
            assert!(result.matched_rule.is_none());
        }
    }

    #[test]
    fn test_rules_are_individually_applicable() {
        let listing = RULES.iter().find(|r| r.name == "list_entities").unwrap();
        assert!(listing.apply("zeige alle stories").is_some());
        assert!(listing.apply("hallo").is_none());
        assert_eq!(RULES.len(), 6);
    }
}
