//! Normalization of the platform's avatar `performance` field.
//!
//! The field shows up in several shapes: a plain rank string, an object
//! keyed by platform with a `rating` or `rank` inside, or alternative
//! platform key spellings. Rank spellings themselves also vary.

use serde_json::Value;

/// Fold spelling variations into the canonical rank set. Unknown but
/// non-empty strings are kept as-is.
pub fn normalize_rank(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let u = s.to_lowercase();
    if u.contains("excellent") {
        return Some("Excellent".to_string());
    }
    if u.contains("good") {
        return Some("Good".to_string());
    }
    if u.contains("medium") {
        return Some("Medium".to_string());
    }
    if u.contains("verypoor") || u.contains("very poor") {
        return Some("VeryPoor".to_string());
    }
    if u.contains("poor") {
        return Some("Poor".to_string());
    }
    Some(s.to_string())
}

/// Pull a rank for `platform` ("standalonewindows" or "android") out of
/// whatever shape the record carries, trying the alternative key
/// spellings before falling back to a top-level `rating`/`rank`.
pub fn rank_for_platform(perf: &Value, platform: &str) -> Option<String> {
    if perf.is_null() {
        return None;
    }

    if let Value::String(s) = perf {
        if let Some(rank) = normalize_rank(s) {
            return Some(rank);
        }
    }

    if let Some(rank) = rank_from_entry(perf.get(platform)) {
        return Some(rank);
    }

    let alt_keys: &[&str] = if platform == "standalonewindows" {
        &["pc", "windows", "win"]
    } else {
        &["quest", "mobile", "android"]
    };
    for key in alt_keys {
        if let Some(rank) = rank_from_entry(perf.get(key)) {
            return Some(rank);
        }
    }

    rank_from_entry(Some(perf))
}

fn rank_from_entry(entry: Option<&Value>) -> Option<String> {
    let entry = entry?;
    let candidate = entry
        .get("rating")
        .or_else(|| entry.get("rank"))
        .unwrap_or(entry);
    match candidate {
        Value::String(s) => normalize_rank(s),
        _ => None,
    }
}
