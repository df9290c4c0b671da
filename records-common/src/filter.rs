//! Substring search over a record and its artist

use std::sync::Arc;

use crate::model::{Artist, Record};

/// Normalized search string: trimmed and lower-cased. Empty disables filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        SearchTerm(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Textual form of every searchable field of the record and its artist.
///
/// `show` is derived from the search itself and is deliberately excluded.
fn field_values(record: &Record, artist: Option<&Artist>) -> Vec<String> {
    let mut values = vec![
        record.id.to_string(),
        record.album_title.clone(),
        record.year.to_string(),
        record.condition.clone(),
        record.artist.to_string(),
    ];
    if let Some(artist) = artist {
        values.push(artist.id.to_string());
        values.push(artist.name.clone());
    }
    values
}

/// True if any field of the record or its artist contains `term` (case-insensitive).
pub fn matches(record: &Record, artist: Option<&Artist>, term: &SearchTerm) -> bool {
    if term.is_empty() {
        return true;
    }
    field_values(record, artist)
        .iter()
        .any(|value| value.to_lowercase().contains(term.as_str()))
}

/// Recompute visibility for one record.
///
/// Returns the same `Arc` when visibility is unchanged, so callers can detect
/// "nothing to re-render" with `Arc::ptr_eq`.
pub fn apply(record: &Arc<Record>, artist: Option<&Artist>, term: &SearchTerm) -> Arc<Record> {
    let show = matches(record, artist, term);
    if record.show == show {
        Arc::clone(record)
    } else {
        Arc::new(Record {
            show,
            ..(**record).clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Year;

    fn record(show: bool) -> Arc<Record> {
        Arc::new(Record {
            id: 1,
            album_title: "Abbey Road".into(),
            year: Year::Number(1969),
            condition: "mint".into(),
            artist: 7,
            show,
        })
    }

    fn artist() -> Artist {
        Artist {
            id: 7,
            name: "The Beatles".into(),
        }
    }

    #[test]
    fn test_search_term_is_normalized() {
        assert_eq!(SearchTerm::new("  BeAtLes ").as_str(), "beatles");
        assert!(SearchTerm::new("   ").is_empty());
    }

    #[test]
    fn test_matches_record_fields() {
        let r = record(true);
        assert!(matches(&r, Some(&artist()), &SearchTerm::new("abbey")));
        assert!(matches(&r, Some(&artist()), &SearchTerm::new("MINT")));
        assert!(matches(&r, Some(&artist()), &SearchTerm::new("196")));
    }

    #[test]
    fn test_matches_artist_name() {
        let r = record(true);
        assert!(matches(&r, Some(&artist()), &SearchTerm::new("beatles")));
        assert!(!matches(&r, None, &SearchTerm::new("beatles")));
    }

    #[test]
    fn test_no_match() {
        assert!(!matches(
            &record(true),
            Some(&artist()),
            &SearchTerm::new("zzz")
        ));
    }

    #[test]
    fn test_show_flag_is_not_searchable() {
        assert!(!matches(
            &record(false),
            Some(&artist()),
            &SearchTerm::new("false")
        ));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(matches(&record(false), None, &SearchTerm::default()));
    }

    #[test]
    fn test_apply_preserves_identity_when_unchanged() {
        let r = record(true);
        let applied = apply(&r, Some(&artist()), &SearchTerm::new("road"));
        assert!(Arc::ptr_eq(&r, &applied));
    }

    #[test]
    fn test_apply_replaces_only_show() {
        let r = record(true);
        let applied = apply(&r, Some(&artist()), &SearchTerm::new("zzz"));
        assert!(!Arc::ptr_eq(&r, &applied));
        assert!(!applied.show);
        assert_eq!(applied.album_title, r.album_title);
        assert_eq!(applied.id, r.id);
    }
}
