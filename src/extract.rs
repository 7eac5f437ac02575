//! Pulls the configuration object out of the model's free-text reply.
//!
//! A fenced ```` ```json ```` block wins when present. Otherwise every `{` is
//! tried in order and the first balanced span that parses as a JSON object
//! with `components` and `totalPrice` is taken. Example objects in the prose
//! are passed over, but a complete configuration sitting before the real
//! answer will still be picked up; the fenced block is what keeps that from
//! happening.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::prompt::SLOTS;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

pub fn extract_config(reply: &str) -> Result<Value, ServiceError> {
    if reply.trim().is_empty() {
        return Err(ServiceError::EmptyReply);
    }

    let value = match fenced_block(reply) {
        Some(block) => {
            debug!("using fenced json block from model reply");
            let value: Value =
                serde_json::from_str(block.trim()).map_err(ServiceError::InvalidJson)?;
            if !value.is_object() {
                return Err(ServiceError::NoJson);
            }
            check_shape(&value)?;
            value
        }
        None => first_config(reply)?,
    };

    warn_missing_slots(&value);
    Ok(value)
}

fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &reply[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(&rest[..end])
}

/// First balanced span that parses as an object and passes [`check_shape`].
///
/// Starts inside a span that balanced but failed to parse are skipped, which
/// keeps brace-heavy prose from being rescanned from every `{`. Objects that
/// parse but lack the required members are not skipped, since the answer may
/// be nested inside one.
fn first_config(reply: &str) -> Result<Value, ServiceError> {
    let mut shape_error = None;
    let mut parse_error = None;
    let mut resume_at = 0;

    for (start, _) in reply.match_indices('{') {
        if start < resume_at {
            continue;
        }
        let Some(len) = balanced_end(&reply[start..]) else {
            continue;
        };
        match serde_json::from_str::<Value>(&reply[start..start + len]) {
            Ok(value) if value.is_object() => match check_shape(&value) {
                Ok(()) => return Ok(value),
                Err(err) => {
                    shape_error.get_or_insert(err);
                }
            },
            Ok(_) => {}
            Err(err) => {
                parse_error.get_or_insert(err);
                resume_at = start + len;
            }
        }
    }

    Err(match (shape_error, parse_error) {
        (Some(err), _) => err,
        (None, Some(err)) => ServiceError::InvalidJson(err),
        (None, None) => ServiceError::NoJson,
    })
}

/// Byte length of the balanced `{...}` span at the start of `text`, skipping
/// braces inside string literals.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_shape(value: &Value) -> Result<(), ServiceError> {
    if !value.get("components").is_some_and(Value::is_object) {
        return Err(ServiceError::IncompleteConfig("components"));
    }
    if value.get("totalPrice").is_none() {
        return Err(ServiceError::IncompleteConfig("totalPrice"));
    }
    Ok(())
}

fn warn_missing_slots(value: &Value) {
    let Some(components) = value.get("components").and_then(Value::as_object) else {
        return;
    };
    let missing: Vec<&str> = SLOTS
        .iter()
        .copied()
        .filter(|slot| !components.contains_key(*slot))
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "model reply omits component slots");
    }
}
