use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EditorError;

/// The résumé sub-record types, plus `Resume` for the document's own
/// scalar fields when a violation has to point at them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Resume,
    Skill,
    Experience,
    Education,
    Project,
    Achievement,
    Language,
    Certification,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Resume => "resume",
            EntityKind::Skill => "skill",
            EntityKind::Experience => "experience",
            EntityKind::Education => "education",
            EntityKind::Project => "project",
            EntityKind::Achievement => "achievement",
            EntityKind::Language => "language",
            EntityKind::Certification => "certification",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value coming from an editor input, before it is assigned to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Number(f64),
    /// Resets an optional field.
    Clear,
}

impl FieldValue {
    fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Number(_) => "number",
            FieldValue::Clear => "clear",
        }
    }

    /// Required text. `Clear` empties it; the validator reports the gap.
    pub(crate) fn into_text(self, kind: EntityKind, field: &'static str) -> Result<String, EditorError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Clear => Ok(String::new()),
            other => Err(mismatch(kind, field, "text", &other)),
        }
    }

    /// Optional text; an empty string counts as absent.
    pub(crate) fn into_optional_text(
        self,
        kind: EntityKind,
        field: &'static str,
    ) -> Result<Option<String>, EditorError> {
        match self {
            FieldValue::Text(s) if s.is_empty() => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            FieldValue::Clear => Ok(None),
            other => Err(mismatch(kind, field, "text", &other)),
        }
    }

    pub(crate) fn into_bool(self, kind: EntityKind, field: &'static str) -> Result<bool, EditorError> {
        match self {
            FieldValue::Bool(b) => Ok(b),
            other => Err(mismatch(kind, field, "bool", &other)),
        }
    }

    /// Integer field. Numeric text from a plain input box is accepted.
    pub(crate) fn into_int(self, kind: EntityKind, field: &'static str) -> Result<i64, EditorError> {
        match self {
            FieldValue::Int(n) => Ok(n),
            FieldValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| mismatch(kind, field, "integer", &FieldValue::Text(s))),
            other => Err(mismatch(kind, field, "integer", &other)),
        }
    }

    pub(crate) fn into_optional_number(
        self,
        kind: EntityKind,
        field: &'static str,
    ) -> Result<Option<f64>, EditorError> {
        match self {
            FieldValue::Number(n) => Ok(Some(n)),
            FieldValue::Int(n) => Ok(Some(n as f64)),
            FieldValue::Clear => Ok(None),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(None),
            FieldValue::Text(s) => match s.trim().parse() {
                Ok(n) => Ok(Some(n)),
                Err(_) => Err(mismatch(kind, field, "number", &FieldValue::Text(s))),
            },
            other => Err(mismatch(kind, field, "number", &other)),
        }
    }
}

fn mismatch(kind: EntityKind, field: &'static str, expected: &'static str, got: &FieldValue) -> EditorError {
    EditorError::FieldType {
        kind,
        field,
        expected,
        got: got.type_name(),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// A date-bearing field as seen by the validator.
#[derive(Debug, Clone, Copy)]
pub struct DateSlot<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub required: bool,
}

/// The start/end pair of entities that span a period of time.
#[derive(Debug, Clone, Copy)]
pub struct Period<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub is_current: bool,
}

/// A range or membership failure reported by an entity about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeIssue {
    pub field: &'static str,
    pub message: String,
}

/// Marker for entity kinds that have no string-array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoListFields {}

/// Contract every résumé sub-record implements so that collections,
/// nested lists and the validator can treat the seven kinds uniformly.
///
/// Entities only declare *which* of their fields are dates, required
/// text, or string arrays; the date rules themselves live in
/// [`crate::editor::dates`].
pub trait Entity: Clone + fmt::Debug {
    const KIND: EntityKind;

    /// Scalar fields addressable by `update`.
    type Field: Copy + fmt::Debug;

    /// String-array fields addressable by the nested list operations.
    type ListField: Copy + fmt::Debug;

    /// Wire name of a scalar field, used in violations and errors.
    fn field_name(field: Self::Field) -> &'static str;

    fn list_name(field: Self::ListField) -> &'static str;

    fn set_field(&mut self, field: Self::Field, value: FieldValue) -> Result<(), EditorError>;

    fn list(&self, field: Self::ListField) -> &Vec<String>;

    fn list_mut(&mut self, field: Self::ListField) -> &mut Vec<String>;

    /// Required text fields with their current values.
    fn required_text(&self) -> Vec<(&'static str, &str)>;

    /// Every date field that should be checked. An end date is left out
    /// while the entity is marked current.
    fn dates(&self) -> Vec<DateSlot<'_>>;

    fn period(&self) -> Option<Period<'_>> {
        None
    }

    fn check_ranges(&self) -> Vec<RangeIssue> {
        Vec::new()
    }
}
