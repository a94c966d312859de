use crate::schema::{RawTriple, Triple};
use regex::Regex;

/// Normalizes triple fields so string equality is node identity:
/// "Paris " and "paris" must land on the same node.
pub struct TripleNormalizer {
    whitespace: Regex,
}

impl TripleNormalizer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Lowercase, trim, and collapse internal whitespace runs to one space.
    pub fn normalize_label(&self, raw: &str) -> String {
        let collapsed = self.whitespace.replace_all(raw.trim(), " ");
        collapsed.to_lowercase()
    }

    /// Normalize all three fields; a triple with any empty field after
    /// normalization is model noise and is dropped.
    pub fn normalize(&self, raw: &RawTriple) -> Option<Triple> {
        let subject = self.normalize_label(&raw.subject);
        let predicate = self.normalize_label(&raw.predicate);
        let object = self.normalize_label(&raw.object);

        if subject.is_empty() || predicate.is_empty() || object.is_empty() {
            return None;
        }

        Some(Triple {
            subject,
            predicate,
            object,
        })
    }
}

impl Default for TripleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        let normalizer = TripleNormalizer::new();

        assert_eq!(normalizer.normalize_label("Paris "), "paris");
        assert_eq!(normalizer.normalize_label("  Marie   Curie\n"), "marie curie");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = TripleNormalizer::new();

        let once = normalizer.normalize_label("  Knowledge \t Graph ");
        let twice = normalizer.normalize_label(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_field_drops_triple() {
        let normalizer = TripleNormalizer::new();

        let raw = RawTriple {
            subject: "a".to_string(),
            predicate: "   ".to_string(),
            object: "b".to_string(),
        };
        assert!(normalizer.normalize(&raw).is_none());
    }

    #[test]
    fn test_complete_triple_survives() {
        let normalizer = TripleNormalizer::new();

        let raw = RawTriple {
            subject: "A".to_string(),
            predicate: "Leads To".to_string(),
            object: " B".to_string(),
        };
        let triple = normalizer.normalize(&raw).unwrap();

        assert_eq!(triple.subject, "a");
        assert_eq!(triple.predicate, "leads to");
        assert_eq!(triple.object, "b");
    }
}
