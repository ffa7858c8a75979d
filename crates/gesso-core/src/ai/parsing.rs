//! JSON parsing helpers for AI backend responses
//!
//! Models rarely return clean JSON: the payload may be wrapped in markdown
//! fences or surrounded by chatter, keys may come in English or Portuguese,
//! and numbers may be strings or not. These helpers accept all of that.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::types::ExtractedEvent;

const MAX_RAW_IN_ERROR: usize = 200;

/// Parse the event list out of a raw model response.
///
/// Accepts `{"events": [...]}`, `{"eventos": [...]}`, a single event object
/// or a bare array.
pub fn parse_extraction(response: &str) -> Result<Vec<ExtractedEvent>> {
    let cleaned = strip_code_fences(response.trim());
    let json_str = locate_json(&cleaned).ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(&cleaned)
        ))
    })?;

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let items = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match field(obj, &["events", "eventos"]) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(Error::InvalidData(
                    "AI response 'events' is not a list".into(),
                ))
            }
            None if field(obj, &["kind", "tipo", "type"]).is_some() => {
                std::slice::from_ref(&value)
            }
            None => {
                return Err(Error::InvalidData(format!(
                    "AI response has no events | Raw: {}",
                    truncate(json_str)
                )))
            }
        },
        _ => {
            return Err(Error::InvalidData(format!(
                "Unexpected JSON shape from AI | Raw: {}",
                truncate(json_str)
            )))
        }
    };

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(wire_event)
        .collect())
}

/// Read one wire event; attributes may sit under `dados`/`data` or at top level
fn wire_event(obj: &Map<String, Value>) -> ExtractedEvent {
    let nested = field(obj, &["dados", "data"]).and_then(Value::as_object);

    ExtractedEvent {
        kind: field(obj, &["kind", "tipo", "type"])
            .and_then(scalar)
            .unwrap_or_default(),
        amount: attr(obj, nested, &["amount", "valor", "value"]).and_then(scalar),
        counterparty: attr(obj, nested, &["counterparty", "cliente", "client"]).and_then(scalar),
        description: attr(obj, nested, &["description", "descricao", "descrição"])
            .and_then(scalar),
        tags: attr(obj, nested, &["tags"])
            .map(string_list)
            .unwrap_or_default(),
        weekdays: attr(obj, nested, &["weekdays", "dias", "days"])
            .map(string_list)
            .unwrap_or_default(),
        advisory: attr(obj, nested, &["advisory", "aviso", "warning"]).and_then(scalar),
    }
}

fn attr<'a>(
    obj: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
    keys: &[&str],
) -> Option<&'a Value> {
    nested
        .and_then(|n| field(n, keys))
        .or_else(|| field(obj, keys))
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

/// Non-empty text from a string or number
fn scalar(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other).into_iter().collect(),
    }
}

/// Drop markdown fence lines (```json ... ```)
fn strip_code_fences(response: &str) -> String {
    if !response.contains("```") {
        return response.to_string();
    }
    response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Slice from the first opening bracket to its last matching closer
fn locate_json(response: &str) -> Option<&str> {
    let start = response.find(['{', '['])?;
    let closer = if response[start..].starts_with('{') {
        '}'
    } else {
        ']'
    };
    let end = response.rfind(closer)?;
    (start < end).then(|| &response[start..=end])
}

fn truncate(raw: &str) -> String {
    if raw.chars().count() > MAX_RAW_IN_ERROR {
        format!("{}...", raw.chars().take(MAX_RAW_IN_ERROR).collect::<String>())
    } else {
        raw.to_string()
    }
}
