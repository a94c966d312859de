use extract::TripleNormalizer;
use extract::schema::strip_code_fences;
use std::collections::HashSet;

/// Outcome of root selection. Fail-open: a parse failure, a call failure, or
/// a selection that matches nothing keeps every root in play rather than
/// dropping the question.
#[derive(Debug, Clone, PartialEq)]
pub enum RootSelection {
    Selected(Vec<String>),
    Fallback(Vec<String>),
}

impl RootSelection {
    pub fn roots(&self) -> &[String] {
        match self {
            RootSelection::Selected(roots) => roots,
            RootSelection::Fallback(roots) => roots,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RootSelection::Fallback(_))
    }
}

pub fn build_selection_prompt(question: &str, roots: &[String]) -> String {
    let root_list = roots
        .iter()
        .map(|label| format!("- {label}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are choosing entry points into a knowledge graph.

ROOT ENTITIES:
{}

USER QUESTION: {}

INSTRUCTIONS:
- Return a JSON array containing only the root entities above that are relevant to the question
- Copy the labels exactly as listed
- Output ONLY the JSON array, no markdown, no explanations

JSON OUTPUT:"#,
        root_list, question
    )
}

/// Parse the selection completion into the subset of known roots it names.
/// Unknown labels are discarded; anything unparseable or an empty result
/// falls back to all roots.
pub fn parse_root_selection(raw: &str, roots: &[String]) -> RootSelection {
    let known: HashSet<&str> = roots.iter().map(String::as_str).collect();
    let normalizer = TripleNormalizer::new();

    let cleaned = strip_code_fences(raw);
    let Ok(labels) = serde_json::from_str::<Vec<String>>(cleaned) else {
        return RootSelection::Fallback(roots.to_vec());
    };

    let mut selected = Vec::new();
    for label in &labels {
        let normalized = normalizer.normalize_label(label);
        if known.contains(normalized.as_str()) && !selected.contains(&normalized) {
            selected.push(normalized);
        }
    }

    if selected.is_empty() {
        return RootSelection::Fallback(roots.to_vec());
    }

    RootSelection::Selected(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_subset_is_selected() {
        let roots = roots(&["paris", "rust", "ocean"]);
        let selection = parse_root_selection(r#"["paris", "rust"]"#, &roots);

        assert_eq!(
            selection,
            RootSelection::Selected(vec!["paris".to_string(), "rust".to_string()])
        );
    }

    #[test]
    fn test_labels_are_normalized_before_matching() {
        let roots = roots(&["marie curie"]);
        let selection = parse_root_selection(r#"["  Marie   Curie "]"#, &roots);

        assert_eq!(
            selection,
            RootSelection::Selected(vec!["marie curie".to_string()])
        );
    }

    #[test]
    fn test_unknown_labels_are_dropped() {
        let roots = roots(&["paris"]);
        let selection = parse_root_selection(r#"["paris", "atlantis"]"#, &roots);

        assert_eq!(selection, RootSelection::Selected(vec!["paris".to_string()]));
    }

    #[test]
    fn test_invalid_json_falls_back_to_all_roots() {
        let roots = roots(&["a", "b"]);
        let selection = parse_root_selection("the relevant roots are a and b", &roots);

        assert!(selection.is_fallback());
        assert_eq!(selection.roots(), roots.as_slice());
    }

    #[test]
    fn test_empty_selection_falls_back() {
        let roots = roots(&["a", "b"]);
        assert!(parse_root_selection("[]", &roots).is_fallback());
    }

    #[test]
    fn test_only_unknown_labels_falls_back() {
        let roots = roots(&["a"]);
        assert!(parse_root_selection(r#"["x", "y"]"#, &roots).is_fallback());
    }

    #[test]
    fn test_fenced_selection_is_accepted() {
        let roots = roots(&["a", "b"]);
        let selection = parse_root_selection("```json\n[\"b\"]\n```", &roots);

        assert_eq!(selection, RootSelection::Selected(vec!["b".to_string()]));
    }
}
