//! Text normalization shared by every matcher in the assistant.
//!
//! Lowercases and folds German umlauts and eszett to ASCII digraphs so that
//! "Priorität", "PRIORITÄT" and "Prioritaet" all compare equal.

/// Returns the canonical matching form of `text`.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

/// Splits normalized text into search keywords, dropping words of two
/// characters or fewer.
pub fn keywords(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '?' | '!' | '.'))
        .filter(|w| w.chars().count() > 2)
        .collect()
}
