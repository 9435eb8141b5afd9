//! Free-text book matching
//!
//! Resolves a spoken or typed query to a catalog entry. The rules run in a
//! fixed order and the first one that hits wins; within a rule, records are
//! tried in catalog insertion order.

use strsim::normalized_levenshtein;
use tracing::debug;

use super::{BookRecord, Catalog};

/// Words dropped from a query before token matching
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "find", "search", "book", "books",
];

/// Words this short (in characters) are dropped from a query
const MAX_DROPPED_WORD_LEN: usize = 2;

/// A lone query word must be at least this long to match by substring
const MIN_SUBSTRING_LEN: usize = 4;

/// Minimum number of shared tokens for the overlap rules
const MIN_OVERLAP: usize = 2;

/// Suggestions scoring below this are not worth showing
const SUGGESTION_FLOOR: f64 = 0.4;

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Normalized query equals a key
    Exact,
    /// Query without stop-words equals a key
    CleanedExact,
    /// Every query word is a word of the key
    KeySuperset,
    /// At least two query words are words of the key
    KeyOverlap,
    /// At least two query words are words of the display name
    NameOverlap,
    /// A single long query word appears inside the key or display name
    Substring,
}

impl MatchRule {
    pub fn name(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::CleanedExact => "cleaned-exact",
            MatchRule::KeySuperset => "key-superset",
            MatchRule::KeyOverlap => "key-overlap",
            MatchRule::NameOverlap => "name-overlap",
            MatchRule::Substring => "substring",
        }
    }
}

/// A successful search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookMatch<'a> {
    pub key: &'a str,
    pub record: &'a BookRecord,
    pub rule: MatchRule,
}

/// Lowercase, trim and collapse whitespace runs to single spaces
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop stop-words and very short words from a query
///
/// The result is normalized and idempotent: cleaning twice changes nothing.
pub fn clean_query(query: &str) -> String {
    normalize_query(query)
        .split(' ')
        .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > MAX_DROPPED_WORD_LEN)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of a display name, lowercased with surrounding punctuation trimmed
fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|w| {
            w.to_lowercase()
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn hit(record: &BookRecord, rule: MatchRule) -> Option<BookMatch<'_>> {
    Some(BookMatch {
        key: record.key.as_str(),
        record,
        rule,
    })
}

fn overlap<S: AsRef<str>>(query_words: &[&str], words: &[S]) -> usize {
    query_words
        .iter()
        .filter(|q| words.iter().any(|w| w.as_ref() == **q))
        .count()
}

impl Catalog {
    /// Find the book a query refers to
    ///
    /// Returns `None` when no rule matches; that is an ordinary outcome.
    pub fn search(&self, query: &str) -> Option<BookMatch<'_>> {
        let found = self.search_inner(query);
        match &found {
            Some(m) => debug!("Query '{}' matched '{}' by {}", query, m.key, m.rule.name()),
            None => debug!("Query '{}' matched nothing", query),
        }
        found
    }

    fn search_inner(&self, query: &str) -> Option<BookMatch<'_>> {
        let normalized = normalize_query(query);
        if let Some(record) = self.get(&normalized) {
            return hit(record, MatchRule::Exact);
        }

        let cleaned = clean_query(&normalized);
        if !cleaned.is_empty() {
            if let Some(record) = self.get(&cleaned) {
                return hit(record, MatchRule::CleanedExact);
            }
        }

        let words: Vec<&str> = cleaned.split_whitespace().collect();

        if !words.is_empty() {
            for record in self.iter() {
                let key_words: Vec<&str> = record.key.split_whitespace().collect();
                if words.iter().all(|w| key_words.contains(w)) {
                    return hit(record, MatchRule::KeySuperset);
                }
            }
        }

        if words.len() >= MIN_OVERLAP {
            for record in self.iter() {
                let key_words: Vec<&str> = record.key.split_whitespace().collect();
                if overlap(&words, &key_words) >= MIN_OVERLAP {
                    return hit(record, MatchRule::KeyOverlap);
                }
            }

            for record in self.iter() {
                if overlap(&words, &name_tokens(&record.name)) >= MIN_OVERLAP {
                    return hit(record, MatchRule::NameOverlap);
                }
            }
        }

        if let [word] = words.as_slice() {
            if word.chars().count() >= MIN_SUBSTRING_LEN {
                for record in self.iter() {
                    if record.key.contains(word) || record.name.to_lowercase().contains(word) {
                        return hit(record, MatchRule::Substring);
                    }
                }
            }
        }

        None
    }

    /// Keys that look similar to a query, best first
    ///
    /// Meant for "did you mean" hints after `search` found nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .iter()
            .map(|record| {
                let by_key = normalized_levenshtein(&normalized, &record.key);
                let by_name = normalized_levenshtein(&normalized, &record.name.to_lowercase());
                (by_key.max(by_name), record.key.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_FLOOR)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookRecord;
    use crate::geometry::{NormBox, Region};

    fn found(catalog: &Catalog, query: &str) -> Option<(String, MatchRule)> {
        catalog.search(query).map(|m| (m.key.to_string(), m.rule))
    }

    fn record(key: &str, name: &str) -> BookRecord {
        BookRecord::new(key, name, 0, Region::Box(NormBox::new(0.5, 0.5, 0.1, 0.1)))
    }

    #[test]
    fn test_every_key_matches_itself() {
        let catalog = Catalog::builtin();
        for key in catalog.keys() {
            let m = catalog.search(key).unwrap();
            assert_eq!(m.key, key);
            assert_eq!(m.rule, MatchRule::Exact);
        }
    }

    #[test]
    fn test_case_and_whitespace_variants() {
        let catalog = Catalog::builtin();
        for key in catalog.keys() {
            let shouted = format!("  {}  ", key.to_uppercase().replace(' ', "   "));
            assert_eq!(catalog.search(&shouted).unwrap().key, key, "variant {:?}", shouted);
        }
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("Find the book Lean Impact"), "lean impact");
        assert_eq!(clean_query("  the   DESIGN "), "design");
        assert_eq!(clean_query("of an ox"), "");
        assert_eq!(clean_query("type & image"), "type image");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let queries = [
            "Find the book Lean Impact",
            "search for books by design",
            "what's mine is yours",
            "a b c dd eee ffff",
            "",
            "LIFE 3.0",
        ];
        for q in queries {
            let once = clean_query(q);
            assert_eq!(clean_query(&once), once);
        }
    }

    #[test]
    fn test_documented_examples() {
        let catalog = Catalog::builtin();
        assert_eq!(found(&catalog, "lean impact"), Some(("lean impact".into(), MatchRule::Exact)));
        assert_eq!(found(&catalog, "lean").map(|f| f.0), Some("lean impact".into()));
        // "the" is dropped, leaving "design"; first key with that word wins
        assert_eq!(found(&catalog, "the design").map(|f| f.0), Some("design justice".into()));
    }

    #[test]
    fn test_cleaned_exact() {
        let catalog = Catalog::builtin();
        assert_eq!(
            found(&catalog, "find the book lean impact"),
            Some(("lean impact".into(), MatchRule::CleanedExact))
        );
    }

    #[test]
    fn test_key_superset() {
        let catalog = Catalog::builtin();
        assert_eq!(
            found(&catalog, "social life"),
            Some(("the social life of information".into(), MatchRule::KeySuperset))
        );
        assert_eq!(found(&catalog, "coffee"), Some(("coffee lids".into(), MatchRule::KeySuperset)));
        assert_eq!(found(&catalog, "rethinking").map(|f| f.0), Some("rethinking users".into()));
    }

    #[test]
    fn test_key_overlap() {
        let catalog = Catalog::builtin();
        assert_eq!(
            found(&catalog, "design justice community"),
            Some(("design justice".into(), MatchRule::KeyOverlap))
        );
    }

    #[test]
    fn test_name_overlap() {
        let catalog = Catalog::builtin();
        assert_eq!(
            found(&catalog, "ecosystem thinking"),
            Some(("rethinking users".into(), MatchRule::NameOverlap))
        );
        // Punctuation attached to a display-name word does not block a match
        assert_eq!(
            found(&catalog, "users ecosystem"),
            Some(("rethinking users".into(), MatchRule::NameOverlap))
        );
    }

    #[test]
    fn test_single_word_substring() {
        let catalog = Catalog::builtin();
        assert_eq!(found(&catalog, "typo"), Some(("typography 34".into(), MatchRule::Substring)));
        assert_eq!(
            found(&catalog, "presentation"),
            Some(("presentationzen".into(), MatchRule::Substring))
        );
        // Matches inside the display name too
        assert_eq!(
            found(&catalog, "heller"),
            Some(("graphic design rants and raves".into(), MatchRule::Substring))
        );
    }

    #[test]
    fn test_short_single_word_does_not_substring_match() {
        let catalog = Catalog::builtin();
        // "zen" survives cleaning but is too short for substring matching
        assert_eq!(found(&catalog, "zen"), None);
    }

    #[test]
    fn test_no_match() {
        let catalog = Catalog::builtin();
        assert!(catalog.search("").is_none());
        assert!(catalog.search("the of and").is_none());
        assert!(catalog.search("xyzzy").is_none());
        assert!(catalog.search("quantum chromodynamics").is_none());
    }

    #[test]
    fn test_ties_resolve_in_insertion_order() {
        let records = vec![record("alpha guide", "Alpha"), record("alpha notes", "Alpha")];
        let first = Catalog::from_records(records).unwrap();
        assert_eq!(first.search("alpha").unwrap().key, "alpha guide");

        let records = vec![record("alpha notes", "Alpha"), record("alpha guide", "Alpha")];
        let second = Catalog::from_records(records).unwrap();
        assert_eq!(second.search("alpha").unwrap().key, "alpha notes");
    }

    #[test]
    fn test_suggest() {
        let catalog = Catalog::builtin();
        let hints = catalog.suggest("lean impakt", 3);
        assert_eq!(hints.first(), Some(&"lean impact"));
        assert!(hints.len() <= 3);

        assert!(catalog.suggest("", 3).is_empty());
        assert!(catalog.suggest("zzzzzzzzzzzzzzzzzzzzzzzz", 3).is_empty());
    }
}
