// src/types/form.rs
//! Raw form input: named field values plus the number of entries per section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_SECTION_ENTRIES: usize = 5;

/// A single raw field value. Files and JSON bodies may carry numbers
/// (a graduation year, a GPA) where the form would have produced text, and
/// JSON clients send `null` for fields left blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
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

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionCounts {
    pub educations: usize,
    pub experiences: usize,
    pub projects: usize,
}

impl Default for SectionCounts {
    fn default() -> Self {
        Self {
            educations: 1,
            experiences: 1,
            projects: 1,
        }
    }
}

impl SectionCounts {
    pub fn new(educations: usize, experiences: usize, projects: usize) -> Self {
        Self {
            educations,
            experiences,
            projects,
        }
    }

    /// Education and projects hold 1 to 5 entries, experiences 0 to 5.
    pub fn clamped(self) -> Self {
        Self {
            educations: self.educations.clamp(1, MAX_SECTION_ENTRIES),
            experiences: self.experiences.min(MAX_SECTION_ENTRIES),
            projects: self.projects.clamp(1, MAX_SECTION_ENTRIES),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub counts: SectionCounts,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl FormInput {
    pub fn new(counts: SectionCounts) -> Self {
        Self {
            counts,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Value of a named field, empty when the field was never filled in.
    pub fn text(&self, key: &str) -> String {
        self.fields
            .get(key)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// Value of a per-entry field such as `degree_0`.
    pub fn indexed(&self, prefix: &str, index: usize) -> String {
        self.text(&format!("{}_{}", prefix, index))
    }
}
