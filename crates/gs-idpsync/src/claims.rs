//! Group claim extraction from the merged claim set.

use serde_json::Value;

use crate::error::ClaimError;

/// Claims merged from every configured identity source for one login.
pub type MergedClaims = serde_json::Map<String, Value>;

/// Read `field` from the merged claims as a list of group names.
///
/// An absent field yields no groups.
///
/// # Errors
///
/// Returns `ClaimError` if the field is present but not a string or an array
/// of strings.
pub fn extract_group_claims(claims: &MergedClaims, field: &str) -> Result<Vec<String>, ClaimError> {
    claims
        .get(field)
        .map_or_else(|| Ok(Vec::new()), parse_string_list_claim)
}

/// Normalize a claim value into a list of strings.
///
/// - `null` and `""` yield an empty list.
/// - A single string yields a one-element list, unless it contains a comma:
///   that is almost always an IDP configured to send CSV instead of an array.
/// - An array must contain only strings.
///
/// # Errors
///
/// Returns `ClaimError` for any other shape.
pub fn parse_string_list_claim(value: &Value) -> Result<Vec<String>, ClaimError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        Value::String(s) if s.contains(',') => Err(ClaimError::CommaSeparated(s.clone())),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ClaimError::NonStringElement {
                    index,
                    found: json_type_name(other),
                }),
            })
            .collect(),
        other => Err(ClaimError::UnexpectedType {
            found: json_type_name(other),
        }),
    }
}

/// JSON type name as used in claim error messages.
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
