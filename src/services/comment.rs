//! Comment service — decode, validate, append, list.
//!
//! DESIGN
//! ======
//! Request bodies arrive as raw bytes. Decoding and validation both run
//! before the store is touched, so the write lock is only ever held for the
//! push itself. Listing is a straight snapshot; any query parameters the
//! route layer receives are logged there and never reach this module.
//!
//! ERROR HANDLING
//! ==============
//! Decode failures and validation failures are distinct variants. Validation
//! collects every violated field, and each field identifier is mapped to a
//! fixed message. Identifiers without a mapping produce no message.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::state::{Comment, CommentStore};

pub const MESSAGE_FIELD: &str = "message";
pub const USER_NAME_FIELD: &str = "userName";

pub const MIN_CHARS: usize = 1;
pub const MESSAGE_MAX_CHARS: usize = 140;
pub const USER_NAME_MAX_CHARS: usize = 15;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "permits only GET or POST";
pub const EMPTY_BODY_MESSAGE: &str = "EOF";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{}", METHOD_NOT_ALLOWED_MESSAGE)]
    MethodNotAllowed,
}

/// A named field plus a human-readable constraint-violation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

/// All recognized violations for one candidate, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|v| v.message)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.messages().collect();
        f.write_str(&joined.join(","))
    }
}

/// Decoded top-level body. `null` stands for an empty object.
type RawBody = Option<Map<String, Value>>;

/// Value of `field` in `object`. An exact key match wins; otherwise the first
/// key equal to `field` ignoring case is used. Absent and `null` values read
/// as empty so they fail validation rather than decoding.
fn string_field(object: &Map<String, Value>, field: &str) -> Result<String, CommentError> {
    let folded = field.to_lowercase();
    let value = object
        .get(field)
        .or_else(|| object.iter().find(|(key, _)| key.to_lowercase() == folded).map(|(_, v)| v));

    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(CommentError::Decode(format!(
            "invalid type for field `{field}`: expected a string, found {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// DECODE / VALIDATE
// =============================================================================

/// Decode the first JSON value of a request body into a candidate comment.
///
/// Anything after the first value is ignored. Keys match case-insensitively
/// and unknown keys are skipped.
///
/// # Errors
///
/// Returns [`CommentError::Decode`] carrying the parser message if the body
/// is empty, is not JSON, or is not an object (or `null`) with string fields.
pub fn decode_comment(body: &[u8]) -> Result<Comment, CommentError> {
    let raw = serde_json::Deserializer::from_slice(body)
        .into_iter::<RawBody>()
        .next()
        .ok_or_else(|| CommentError::Decode(EMPTY_BODY_MESSAGE.into()))?
        .map_err(|e| CommentError::Decode(e.to_string()))?;

    let object = raw.unwrap_or_default();
    Ok(Comment::new(string_field(&object, MESSAGE_FIELD)?, string_field(&object, USER_NAME_FIELD)?))
}

/// Message for a violated field, if the field has one.
#[must_use]
pub fn violation_message(field: &str) -> Option<&'static str> {
    match field {
        MESSAGE_FIELD => Some("must be 1 to 140 characters"),
        USER_NAME_FIELD => Some("must be 1 to 15 characters"),
        _ => None,
    }
}

fn within_length(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Identifiers of every field whose length rule is violated.
fn violated_fields(comment: &Comment) -> Vec<&'static str> {
    [
        (MESSAGE_FIELD, comment.message.as_str(), MESSAGE_MAX_CHARS),
        (USER_NAME_FIELD, comment.user_name.as_str(), USER_NAME_MAX_CHARS),
    ]
    .into_iter()
    .filter(|(_, value, max)| !within_length(value, MIN_CHARS, *max))
    .map(|(field, _, _)| field)
    .collect()
}

/// Map violated field identifiers to violations, dropping unmapped ones.
fn collect_violations(fields: impl IntoIterator<Item = &'static str>) -> ValidationErrors {
    ValidationErrors(
        fields
            .into_iter()
            .filter_map(|field| violation_message(field).map(|message| FieldViolation { field, message }))
            .collect(),
    )
}

/// Check all field constraints on `comment`.
///
/// # Errors
///
/// Returns every recognized violation, not just the first.
pub fn validate_comment(comment: &Comment) -> Result<(), ValidationErrors> {
    let errors = collect_violations(violated_fields(comment));
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Current comments in insertion order.
pub async fn list_comments(store: &CommentStore) -> Vec<Comment> {
    store.snapshot().await
}

/// Decode, validate, and append a comment from a raw request body.
///
/// # Errors
///
/// Returns [`CommentError::Decode`] for a malformed body and
/// [`CommentError::Validation`] when any field constraint fails. Nothing is
/// appended in either case.
pub async fn create_comment(store: &CommentStore, body: &[u8]) -> Result<(), CommentError> {
    let comment = decode_comment(body).inspect_err(|e| warn!(error = %e, "comment: malformed body"))?;

    if let Err(errors) = validate_comment(&comment) {
        warn!(violations = %errors, "comment: validation failed");
        return Err(CommentError::Validation(errors));
    }

    let user_name = comment.user_name.clone();
    let total = store.append(comment).await;
    info!(%user_name, total, "comment: created");
    Ok(())
}

#[cfg(test)]
#[path = "comment_test.rs"]
mod tests;
