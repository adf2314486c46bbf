//! Structured-field extraction from conversation exchanges.
//!
//! Issues a second, extraction-only completion against the active backend,
//! then derives a field set from its reply in three tiers:
//!
//! 1. Strict JSON parse of the (fence-stripped) reply
//! 2. Tolerant per-field key/value scan over the raw text
//! 3. Deterministic keyword fallback over the user's message, used when the
//!    backend call itself fails
//!
//! Extraction is total: every failure degrades to a later tier, never to an
//! error. A field the model did not produce is simply absent from the
//! result, which is what drives the "needs more info" decision downstream.
//!
//! The extraction call is independent of conversation history; it sees only
//! the current user message and the assistant's reply. That makes every chat
//! message cost two completions, a deliberate trade-off for keeping the
//! extraction prompt small and schema-focused.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ports::{ChatBackend, CompletionRequest, MessageRole};

use super::types::{ExtractedFields, UserClass};

/// Field names expected for a customer exchange.
const CUSTOMER_FIELDS: &[&str] = &[
    "serviceType",
    "urgency",
    "location",
    "budget",
    "hasBudget",
    "specificNeeds",
];

/// Field names expected for a tradesperson exchange.
const TRADESPERSON_FIELDS: &[&str] = &[
    "tradeSkills",
    "qualified",
    "availability",
    "serviceAreas",
    "experienceLevel",
];

/// Derives structured fields from free-text model output.
pub struct ExtractionEngine {
    backend: Arc<dyn ChatBackend>,
}

impl ExtractionEngine {
    /// Creates an engine issuing extraction completions against `backend`.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Extracts a field set for the current exchange.
    ///
    /// Never fails: a backend error abandons AI extraction and runs the
    /// keyword fallback instead. The engine-added `messageLength` and
    /// `timestamp` fields are attached on every path.
    pub async fn extract(
        &self,
        user_class: UserClass,
        user_text: &str,
        model_reply: &str,
    ) -> ExtractedFields {
        let prompt = extraction_prompt(user_class, user_text, model_reply);
        let request = CompletionRequest::new().with_message(MessageRole::User, prompt);

        let mut fields = match self.backend.complete(request).await {
            Ok(reply) => {
                debug!(user_class = user_class.as_str(), "parsing extraction reply");
                parse_fields(&reply, user_class)
            }
            Err(err) => {
                warn!(
                    engine = %self.backend.info().engine,
                    stage = "extraction",
                    error = %err,
                    kind = err.kind(),
                    "extraction completion failed, using keyword fallback"
                );
                fallback_extract(user_class, user_text)
            }
        };

        attach_engine_fields(&mut fields, user_text);
        fields
    }
}

/// Builds the extraction-only prompt for the given exchange.
fn extraction_prompt(user_class: UserClass, user_text: &str, model_reply: &str) -> String {
    match user_class {
        UserClass::Customer => format!(
            "Extract structured information from this customer conversation. \
             Return ONLY a JSON object with these fields:\n\
             {{\n\
             \x20 \"serviceType\": \"Plumbing|Electrical|Painting|Carpentry|Gardening|General|Other\",\n\
             \x20 \"urgency\": \"Low|Medium|High\",\n\
             \x20 \"location\": \"extracted location or null\",\n\
             \x20 \"budget\": \"extracted budget or null\",\n\
             \x20 \"hasBudget\": true/false,\n\
             \x20 \"specificNeeds\": \"brief description or null\"\n\
             }}\n\n\
             Customer message: {user_text}\n\
             AI response: {model_reply}\n\n\
             Return only the JSON object:"
        ),
        UserClass::Tradesperson => format!(
            "Extract structured information from this tradesperson conversation. \
             Return ONLY a JSON object with these fields:\n\
             {{\n\
             \x20 \"tradeSkills\": [\"list of mentioned skills\"],\n\
             \x20 \"qualified\": true/false,\n\
             \x20 \"availability\": \"Available|Busy|Unknown\",\n\
             \x20 \"serviceAreas\": [\"list of mentioned areas\"],\n\
             \x20 \"experienceLevel\": \"Beginner|Intermediate|Expert|Unknown\"\n\
             }}\n\n\
             Tradesperson message: {user_text}\n\
             AI response: {model_reply}\n\n\
             Return only the JSON object:"
        ),
    }
}

/// Expected field names for a user class.
fn expected_fields(user_class: UserClass) -> &'static [&'static str] {
    match user_class {
        UserClass::Customer => CUSTOMER_FIELDS,
        UserClass::Tradesperson => TRADESPERSON_FIELDS,
    }
}

/// Parses an extraction reply into a field set. Total.
///
/// Tier 1 is a strict JSON parse of the fence-stripped reply; tier 2 is a
/// tolerant per-field scan over the same text. A field found with a `null`
/// value is treated as absent.
fn parse_fields(reply: &str, user_class: UserClass) -> ExtractedFields {
    let cleaned = strip_code_fences(reply);

    if let Some(fields) = strict_parse(cleaned, expected_fields(user_class)) {
        return fields;
    }

    debug!("strict JSON parse failed, falling back to tolerant field scan");
    let mut fields = ExtractedFields::new();
    for name in expected_fields(user_class) {
        if let Some(value) = scan_field(cleaned, name) {
            fields.insert_text(*name, value);
        }
    }
    fields
}

/// Strips a literal ```` ```json ```` prefix and trailing ```` ``` ````
/// fence, then trims whitespace.
fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Strict tier: parse the reply as a JSON object and pick out the expected
/// fields, dropping nulls. Returns `None` when the text is not valid JSON
/// or not an object.
fn strict_parse(text: &str, expected: &[&str]) -> Option<ExtractedFields> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    let mut fields = ExtractedFields::new();
    for name in expected {
        match object.get(*name) {
            Some(Value::Null) | None => {}
            Some(value) => fields.insert(*name, value.clone()),
        }
    }
    Some(fields)
}

/// Tolerant tier: scan for `"name" : value` in JSON-shaped text.
///
/// Accepts whitespace around the colon, optional quoting, and a trailing
/// comma or closing brace. The value ends at the first `"`, `,` or `}`.
/// `null` normalizes to absence; the literal tokens `true` and `false`
/// pass through as-is.
fn scan_field(text: &str, name: &str) -> Option<String> {
    let key = format!("\"{name}\"");
    let key_start = text.find(&key)?;
    let rest = text[key_start + key.len()..].trim_start();
    let rest = rest.strip_prefix(':')?.trim_start();
    let rest = rest.strip_prefix('"').unwrap_or(rest);

    let end = rest
        .find(|c| c == '"' || c == ',' || c == '}')
        .unwrap_or(rest.len());
    let value = rest[..end].trim();

    if value.is_empty() || value == "null" {
        return None;
    }
    Some(value.to_string())
}

/// Keyword fallback: deterministic field derivation from the raw user text,
/// used when AI extraction is unavailable.
///
/// Only customers have keyword rules. The tradesperson path intentionally
/// yields an empty set; there is no keyword vocabulary defined for trade
/// skills, and inventing one here would fabricate data the conversation
/// never contained.
pub fn fallback_extract(user_class: UserClass, user_text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    if user_class != UserClass::Customer {
        return fields;
    }

    let lower = user_text.to_lowercase();

    if lower.contains("plumber") || lower.contains("plumbing") {
        fields.insert_text("serviceType", "Plumbing");
    } else if lower.contains("electrician") || lower.contains("electrical") {
        fields.insert_text("serviceType", "Electrical");
    } else if lower.contains("painter") || lower.contains("painting") {
        fields.insert_text("serviceType", "Painting");
    }

    if lower.contains("urgent") || lower.contains("emergency") {
        fields.insert_text("urgency", "High");
    }

    fields
}

/// Attaches the engine-added fields present on every extraction path.
fn attach_engine_fields(fields: &mut ExtractedFields, user_text: &str) {
    fields.insert(
        "messageLength",
        Value::from(user_text.chars().count() as u64),
    );
    fields.insert_text("timestamp", Utc::now().to_rfc3339());
}
