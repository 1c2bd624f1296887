//! Entity recognition fallback
//!
//! The name grammar consults a general-purpose entity recognizer only after
//! every pattern failed. `LlmEntityRecognizer` asks a language model to tag
//! entities in one sentence and parses its JSON answer; `NullRecognizer` is
//! the recognizer of an extractor that has none.

use crate::error::ExtractorError;
use arztbrief_domain::traits::{EntityRecognizer, LlmProvider};
use arztbrief_domain::{Entity, EntityLabel};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::Display;
use tracing::{debug, warn};

/// JSON schema hint passed to providers with structured output
pub const ENTITY_SCHEMA: &str = r#"{"type":"object","properties":{"entities":{"type":"array","items":{"type":"object","properties":{"text":{"type":"string"},"label":{"type":"string"}},"required":["text","label"]}}},"required":["entities"]}"#;

/// Recognizer that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecognizer;

impl EntityRecognizer for NullRecognizer {
    type Error = Infallible;

    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, Self::Error> {
        Ok(Vec::new())
    }
}

/// Entity recognizer backed by a language model
pub struct LlmEntityRecognizer<L> {
    llm: L,
}

impl<L> LlmEntityRecognizer<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Wrap a provider
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Access the underlying provider
    pub fn provider(&self) -> &L {
        &self.llm
    }
}

impl<L> EntityRecognizer for LlmEntityRecognizer<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    fn recognize(&self, text: &str) -> Result<Vec<Entity>, Self::Error> {
        let prompt = PromptBuilder::new(text).build();
        debug!("Entity prompt length: {} chars", prompt.len());

        let response = self
            .llm
            .generate_structured(&prompt, ENTITY_SCHEMA)
            .map_err(|e| ExtractorError::Recognition(e.to_string()))?;

        parse_entities(&response)
    }

    fn ensure_ready(&self) -> Result<(), Self::Error> {
        self.llm
            .health_check()
            .map_err(|e| ExtractorError::RecognizerUnavailable(e.to_string()))
    }
}

/// Builds the entity-tagging prompt for one text span
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for a text span
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(TAGGING_INSTRUCTIONS);
        prompt.push_str("\n\n---\n\n");

        prompt.push_str("Text:\n");
        prompt.push_str(self.text);
        prompt.push_str("\n\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const TAGGING_INSTRUCTIONS: &str = r#"Tag the named entities in the following German text.

Labels:
- PER: a person (patient, physician, relative)
- ORG: an organization (hospital, practice, insurer)
- LOC: a place
- MISC: anything else

Rules:
- Copy each entity exactly as written in the text
- Do not include salutations or titles (Frau, Herr, Dr.) in a PER entity
- List entities in the order they appear
- Do not invent entities that are not in the text"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{"entities": [{"text": "Anna Müller", "label": "PER"}]}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

/// Parse an entity-tagging response
///
/// Accepts either `{"entities": [...]}` or a bare array. Entries that are not
/// objects with string `text` and `label` are skipped with a warning.
pub fn parse_entities(response: &str) -> Result<Vec<Entity>, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let items = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("entities")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ExtractorError::InvalidFormat("Expected an \"entities\" array".to_string())
            })?,
        _ => {
            return Err(ExtractorError::InvalidFormat(
                "Expected JSON object or array".to_string(),
            ))
        }
    };

    let mut entities = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match parse_entity_json(item) {
            Ok(entity) => entities.push(entity),
            Err(e) => warn!("Skipping entity {}: {}", idx, e),
        }
    }

    Ok(entities)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Drop the opening fence and, if present, the closing one
        let end = if lines[lines.len() - 1].trim() == "```" {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_entity_json(json: &Value) -> Result<Entity, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Entity is not a JSON object".to_string())?;

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| "Missing or empty 'text'".to_string())?;

    let label = obj
        .get("label")
        .and_then(Value::as_str)
        .ok_or_else(|| "Missing or invalid 'label'".to_string())?;

    Ok(Entity::new(text, EntityLabel::from_label(label)))
}
