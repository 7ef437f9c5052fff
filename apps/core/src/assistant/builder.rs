//! Response builders, one per intent.
//!
//! Every builder is a pure function of the story snapshot and the extracted
//! parameters. Missing parameters and empty results are answered with
//! clarifying or informational text, never with an error.

use std::collections::BTreeMap;

use crate::models::{Story, StorySource, StoryStatus};

use super::filter::filter_stories;
use super::intent::{Intent, IntentResult, PARAM_FILTER, PARAM_PROJECT, PARAM_TOPIC, PARAM_VALUE};
use super::normalize::{keywords, normalize};
use super::response::{BulkChange, BulkField, ChatMessage, PendingOperation, Response};

/// Canned prompts offered when the input was not understood, one per intent family.
pub const SUGGESTION_CHIPS: [&str; 4] = [
    "Setze die Priorität aller Draft-Stories auf Hoch",
    "Gibt es Tickets zum Thema Login?",
    "Wie ist der aktuelle Status von Projekt E-Commerce Platform?",
    "Zeige alle Stories mit Status In Progress",
];

/// Dispatches a classified intent to its builder.
pub fn build_response(result: &IntentResult, stories: &[Story]) -> Response {
    match result.intent {
        Intent::BulkPriority => build_bulk_change(
            BulkField::Priority,
            result.param(PARAM_FILTER),
            result.param(PARAM_VALUE),
            stories,
        ),
        Intent::BulkStatus => build_bulk_change(
            BulkField::Status,
            result.param(PARAM_FILTER),
            result.param(PARAM_VALUE),
            stories,
        ),
        Intent::BulkEffort => build_bulk_change(
            BulkField::Effort,
            result.param(PARAM_FILTER),
            result.param(PARAM_VALUE),
            stories,
        ),
        Intent::SearchTopic => build_topic_search(result.param(PARAM_TOPIC), stories),
        Intent::ProjectStatus => build_project_status(result.param(PARAM_PROJECT), stories),
        Intent::ListEntities => build_listing(result.param(PARAM_FILTER), stories),
        Intent::Unknown => build_fallback(),
    }
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// Proposes setting `field` to `raw_value` on every story matching `filter`.
///
/// Stories that already carry the target value are left out. When something
/// remains, the response carries a preview message and a pending operation
/// with the same change set.
pub fn build_bulk_change(field: BulkField, filter: &str, raw_value: &str, stories: &[Story]) -> Response {
    if raw_value.trim().is_empty() {
        return Response::text(format!(
            "Auf welchen Wert soll die {} gesetzt werden? Zum Beispiel: „Setze die {} aller Draft-Stories auf Hoch“.",
            field.display_name(),
            field.display_name()
        ));
    }

    let new_value = field.resolve_value(raw_value);
    let targets = filter_stories(filter, stories);

    let changes: Vec<BulkChange> = targets
        .iter()
        .filter(|story| field.current_value(story) != new_value)
        .map(|story| BulkChange {
            id: story.id.clone(),
            title: story.title.clone(),
            field,
            old_value: field.current_value(story).to_string(),
            new_value: new_value.clone(),
        })
        .collect();

    if changes.is_empty() {
        let reason = if targets.is_empty() {
            format!("Ich habe keine passenden Stories für „{}“ gefunden.", filter)
        } else if targets.len() == 1 {
            format!(
                "Die passende Story hat bereits {} **{}**.",
                field.display_name(),
                new_value
            )
        } else {
            format!(
                "Alle {} passenden Stories haben bereits {} **{}**.",
                targets.len(),
                field.display_name(),
                new_value
            )
        };
        return Response::text(format!("Keine Änderungen nötig. {}", reason));
    }

    let summary = format!(
        "Ich habe **{}** gefunden, deren {} auf **{}** geändert wird. Bitte prüfe die Vorschau und bestätige die Änderungen.",
        plural(changes.len(), "Story", "Stories"),
        field.display_name(),
        new_value
    );
    let operation = PendingOperation {
        field,
        new_value: new_value.clone(),
        changes,
    };
    let preview = ChatMessage::bulk_preview(
        format!("Vorschau: {} → {}", field.display_name(), new_value),
        &operation,
    );

    Response::new(vec![ChatMessage::text(summary), preview]).with_pending(operation)
}

/// Counts matches per provenance, e.g. "Quellen: 2× KI-generiert, 1× Jira-Import, 0× manuell".
fn source_summary(stories: &[&Story]) -> String {
    let parts: Vec<String> = StorySource::ALL
        .iter()
        .map(|source| {
            let count = stories.iter().filter(|s| s.source == *source).count();
            format!("{}× {}", count, source.display_name())
        })
        .collect();
    format!("Quellen: {}", parts.join(", "))
}

/// Keyword search over title, description, tags, role and goal.
pub fn build_topic_search(topic: &str, stories: &[Story]) -> Response {
    let topic = topic.trim();
    if topic.is_empty() {
        return Response::text(
            "Zu welchem Thema soll ich suchen? Zum Beispiel: „Gibt es Tickets zum Thema Login?“",
        );
    }

    let needle = normalize(topic);
    let words = keywords(&needle);
    let hits: Vec<&Story> = stories
        .iter()
        .filter(|s| {
            let blob = normalize(&format!(
                "{} {} {} {} {}",
                s.title,
                s.description,
                s.tags.join(" "),
                s.role,
                s.goal
            ));
            words.iter().any(|w| blob.contains(w))
        })
        .collect();

    if hits.is_empty() {
        return Response::text(format!(
            "Zum Thema „{}“ habe ich leider keine Tickets oder Stories gefunden.",
            topic
        ));
    }

    let text = format!(
        "Ich habe **{}** zum Thema „{}“ gefunden.",
        format!("{} Treffer", hits.len()),
        topic
    );
    let result = ChatMessage::query_result(
        format!("Suchergebnisse für „{}“", topic),
        &hits,
        Some(source_summary(&hits)),
    );
    Response::new(vec![ChatMessage::text(text), result])
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Status breakdown and average compliance score for one project.
pub fn build_project_status(project: &str, stories: &[Story]) -> Response {
    let project = project.trim();
    if project.is_empty() {
        return Response::text(
            "Für welches Projekt möchtest du den Status sehen? Zum Beispiel: „Wie ist der aktuelle Status von Projekt E-Commerce Platform?“",
        );
    }

    let needle = normalize(project);
    let hits: Vec<&Story> = stories
        .iter()
        .filter(|s| normalize(&s.project).contains(&needle))
        .collect();

    if hits.is_empty() {
        let known = distinct(stories.iter().map(|s| s.project.as_str()));
        let hint = if known.is_empty() {
            "Es sind noch keine Projekte vorhanden.".to_string()
        } else {
            format!("Bekannte Projekte: {}.", known.join(", "))
        };
        return Response::text(format!("Ich habe kein Projekt „{}“ gefunden. {}", project, hint));
    }

    let names = distinct(hits.iter().map(|s| s.project.as_str())).join(", ");

    let mut by_status: BTreeMap<StoryStatus, usize> = BTreeMap::new();
    for story in &hits {
        *by_status.entry(story.status).or_insert(0) += 1;
    }
    let breakdown: Vec<String> = by_status
        .iter()
        .map(|(status, count)| format!("{}× {}", count, status))
        .collect();

    let scores: Vec<f64> = hits.iter().filter_map(|s| s.compliance_score).collect();

    let mut lines = vec![
        format!("**Projektstatus: {}**", names),
        format!(
            "{}: {}",
            plural(hits.len(), "Story", "Stories"),
            breakdown.join(", ")
        ),
    ];
    if !scores.is_empty() {
        let average = (scores.iter().sum::<f64>() / scores.len() as f64).round() as i64;
        lines.push(format!("Durchschnittlicher Compliance-Score: {} %", average));
    }

    let result = ChatMessage::query_result(format!("Stories im Projekt {}", names), &hits, None);
    Response::new(vec![ChatMessage::text(lines.join("\n")), result])
}

/// Lists stories narrowed by the filter cascade.
pub fn build_listing(filter: &str, stories: &[Story]) -> Response {
    let filter = filter.trim();
    let hits = filter_stories(filter, stories);

    if hits.is_empty() {
        if filter.is_empty() {
            return Response::text("Es sind keine Einträge vorhanden.");
        }
        return Response::text(format!("Keine Einträge für den Filter „{}“ gefunden.", filter));
    }

    let text = if filter.is_empty() {
        format!("Hier sind alle **{}**:", plural(hits.len(), "Eintrag", "Einträge"))
    } else {
        format!(
            "Ich habe **{}** für den Filter „{}“ gefunden.",
            plural(hits.len(), "Eintrag", "Einträge"),
            filter
        )
    };
    let result = ChatMessage::query_result("Einträge", &hits, None);
    Response::new(vec![ChatMessage::text(text), result])
}

/// Static answer for unrecognized input, with one suggestion per intent family.
pub fn build_fallback() -> Response {
    Response::new(vec![
        ChatMessage::text(
            "Das habe ich leider nicht verstanden. Ich kann Felder mehrerer Stories auf einmal ändern, \
             nach Themen suchen, den Status eines Projekts zusammenfassen und Stories auflisten. \
             Probiere zum Beispiel:",
        ),
        ChatMessage::suggestion_chips("Vorschläge", &SUGGESTION_CHIPS),
    ])
}
