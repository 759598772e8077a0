use serde_json::{Map, Value};

use super::GenerationError;
use crate::jobs::repo_types::GeneratedContent;

/// Returns the first JSON object embedded in `text`: scanning left to right, the
/// earliest `{` at which a complete object parses. Text after the object is ignored.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    text.char_indices()
        .filter(|&(_, c)| c == '{')
        .find_map(|(i, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[i..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(Value::Object(map))) => Some(map),
                _ => None,
            }
        })
}

/// Parses a model response into the expected four-part shape.
pub fn parse_generated_content(text: &str) -> Result<GeneratedContent, GenerationError> {
    let obj = extract_json_object(text).ok_or(GenerationError::NoJsonObject)?;

    Ok(GeneratedContent {
        about_us: text_field(&obj, "aboutUs")?,
        responsibilities: list_field(&obj, "responsibilities")?,
        required_skills: list_field(&obj, "requiredSkills")?,
        benefits: list_field(&obj, "benefits")?,
    })
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Result<String, GenerationError> {
    let value = obj
        .get(key)
        .ok_or_else(|| GenerationError::Malformed(format!("missing field {key}")))?;
    as_text(value).ok_or_else(|| GenerationError::Malformed(format!("{key} is not text")))
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, GenerationError> {
    let items = obj
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::Malformed(format!("missing list {key}")))?;
    items
        .iter()
        .map(|v| {
            as_text(v).ok_or_else(|| GenerationError::Malformed(format!("{key} has a non-text item")))
        })
        .collect()
}

/// Model output is untrusted: scalars become opaque text, anything structured is refused.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
