//! Normalization of loosely typed form fields.
//!
//! Multipart forms deliver list-like fields in three shapes: a repeated field
//! (`categories=Travel&categories=Nature`), a JSON-encoded array in a single
//! field (`existingImages=["a.jpg"]`) or one bare value (`categories=Travel`).
//! [`parse_list_field`] turns all of them into a `Vec<String>`, and
//! [`parse_categories`] adds the category rules on top. Create and update go
//! through the same functions.

use serde_json::Value;

use super::entities::{Category, MAX_CATEGORIES};

/// A raw form value as collected from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    List(Vec<String>),
}

impl FormValue {
    /// Adds another occurrence of the same field. A second occurrence turns a
    /// single value into a list.
    pub fn push(self, value: String) -> Self {
        match self {
            FormValue::Text(first) => FormValue::List(vec![first, value]),
            FormValue::List(mut items) => {
                items.push(value);
                FormValue::List(items)
            }
        }
    }

    /// True when the field carries nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Text(text) => text.trim().is_empty(),
            FormValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<Vec<&str>> for FormValue {
    fn from(values: Vec<&str>) -> Self {
        FormValue::List(values.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValueError {
    #[error("expected a list of strings")]
    NotAStringList,
}

/// Normalizes a list-like field.
///
/// - a list is returned as-is
/// - a single value holding a JSON array of strings is decoded
/// - a single value holding a JSON string is decoded and wrapped
/// - any other single value is wrapped verbatim
///
/// JSON arrays with non-string members and JSON objects are rejected.
pub fn parse_list_field(raw: &FormValue) -> Result<Vec<String>, FormValueError> {
    let text = match raw {
        FormValue::List(items) => return Ok(items.clone()),
        FormValue::Text(text) => text,
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(FormValueError::NotAStringList),
            })
            .collect(),
        Ok(Value::String(s)) => Ok(vec![s]),
        Ok(Value::Object(_)) => Err(FormValueError::NotAStringList),
        _ => Ok(vec![text.clone()]),
    }
}

/// Why a category field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("Categories must be a list of strings")]
    Malformed,
    #[error("A post can have at most 3 categories, got {0}")]
    TooMany(usize),
    #[error("Invalid category '{0}'")]
    Unknown(String),
}

impl From<FormValueError> for CategoryError {
    fn from(_: FormValueError) -> Self {
        CategoryError::Malformed
    }
}

/// Normalizes a category field and checks it against the category rules.
///
/// Labels are trimmed and blank entries dropped. The count is checked before
/// membership, so an over-long list reports [`CategoryError::TooMany`] even
/// when it also holds unknown labels.
pub fn parse_categories(raw: &FormValue) -> Result<Vec<String>, CategoryError> {
    let categories: Vec<String> = parse_list_field(raw)?
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if categories.len() > MAX_CATEGORIES {
        return Err(CategoryError::TooMany(categories.len()));
    }

    if let Some(unknown) = categories.iter().find(|c| !Category::is_valid(c)) {
        return Err(CategoryError::Unknown(unknown.clone()));
    }

    Ok(categories)
}

/// Parses a boolean form flag the way HTML forms and the frontend send it.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_is_wrapped() {
        assert_eq!(
            parse_list_field(&"Travel".into()),
            Ok(vec!["Travel".to_string()])
        );
    }

    #[test]
    fn test_json_array_is_decoded() {
        assert_eq!(
            parse_list_field(&r#"["Travel","Nature"]"#.into()),
            Ok(vec!["Travel".to_string(), "Nature".to_string()])
        );
        assert_eq!(parse_list_field(&"[]".into()), Ok(vec![]));
    }

    #[test]
    fn test_json_string_is_decoded() {
        assert_eq!(
            parse_list_field(&r#""City""#.into()),
            Ok(vec!["City".to_string()])
        );
    }

    #[test]
    fn test_repeated_field_is_kept() {
        let raw = FormValue::from("Travel").push("Nature".to_string());
        assert_eq!(raw, FormValue::from(vec!["Travel", "Nature"]));
        assert_eq!(
            parse_list_field(&raw),
            Ok(vec!["Travel".to_string(), "Nature".to_string()])
        );
    }

    #[test]
    fn test_non_string_members_are_rejected() {
        assert_eq!(
            parse_list_field(&"[1, 2]".into()),
            Err(FormValueError::NotAStringList)
        );
        assert_eq!(
            parse_list_field(&r#"{"a":"b"}"#.into()),
            Err(FormValueError::NotAStringList)
        );
    }

    #[test]
    fn test_scalar_json_is_wrapped_verbatim() {
        assert_eq!(parse_list_field(&"42".into()), Ok(vec!["42".to_string()]));
    }

    #[test]
    fn test_categories_keep_order() {
        assert_eq!(
            parse_categories(&r#"["Nature","Travel"]"#.into()),
            Ok(vec!["Nature".to_string(), "Travel".to_string()])
        );
    }

    #[test]
    fn test_categories_limit() {
        let raw = FormValue::from(vec!["Travel", "Nature", "City", "Beaches"]);
        assert_eq!(parse_categories(&raw), Err(CategoryError::TooMany(4)));

        let raw = FormValue::from(vec!["Travel", "Nature", "City"]);
        assert!(parse_categories(&raw).is_ok());
    }

    #[test]
    fn test_categories_membership() {
        assert_eq!(
            parse_categories(&"Skiing".into()),
            Err(CategoryError::Unknown("Skiing".to_string()))
        );
        assert_eq!(
            parse_categories(&"[3]".into()),
            Err(CategoryError::Malformed)
        );
    }

    #[test]
    fn test_categories_are_trimmed() {
        assert_eq!(
            parse_categories(&FormValue::from(vec![" Travel", "", "City "])),
            Ok(vec!["Travel".to_string(), "City".to_string()])
        );

        let raw = FormValue::from(vec!["Travel", " ", "Nature", "", "City"]);
        assert_eq!(parse_categories(&raw).map(|c| c.len()), Ok(3));
    }

    #[test]
    fn test_blank_detection() {
        assert!(FormValue::from("  ").is_blank());
        assert!(!FormValue::from("[]").is_blank());
        assert!(FormValue::from(vec!["", " "]).is_blank());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
