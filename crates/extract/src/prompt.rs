/// System instructions for the triple-extraction call. The chunk text goes
/// in as the user message.
pub const EXTRACTION_INSTRUCTIONS: &str = r#"Extract subject-predicate-object facts from the text you are given.

INSTRUCTIONS:
1. Identify factual relationships between entities, concepts, people, places and events
2. Express each fact as a subject, a predicate and an object
3. Output ONLY a valid JSON array, nothing else

SCHEMA:
[
  {"subject": "entity one", "predicate": "relationship", "object": "entity two"}
]

RULES:
- Keep subjects and objects short noun phrases
- Predicates should be short verbs or verb phrases: "leads to", "invented", "is part of"
- Every field must be non-empty
- Extract every distinct fact in the text, nothing speculative
- Output ONLY the JSON array, no markdown, no explanations"#;

pub fn build_retry_prompt(invalid_json: &str) -> String {
    format!(
        r#"The following JSON is invalid:

{}

Fix this JSON. Output only a valid JSON array with no markdown formatting, no code blocks, no explanations. Just the raw JSON array."#,
        invalid_json
    )
}
