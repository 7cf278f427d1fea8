use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reference to a locally selected file. The file itself is never opened,
/// read, or transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

impl FileRef {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    pub fn is_empty(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

/// A single entry in the value bag.
///
/// Serialized untagged so the echoed payload reads like the plain JSON the
/// user typed: text as strings, tag lists as arrays, files as objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Tags(Vec<String>),
    File(FileRef),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn tags<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tags(values.into_iter().map(Into::into).collect())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileRef::from_path(path))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&[String]> {
        match self {
            Self::Tags(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(reference) => Some(reference),
            _ => None,
        }
    }

    /// Textual rendering used by numeric parsing and condition checks.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value.clone()),
            Self::Number(value) => Some(format!("{value}")),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(_) => false,
            Self::Tags(values) => values.is_empty(),
            Self::File(reference) => reference.is_empty(),
        }
    }
}

/// The live set of current form field values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn tags(&self, field: &str) -> Option<&[String]> {
        self.get(field).and_then(FieldValue::as_tags)
    }

    pub fn file(&self, field: &str) -> Option<&FileRef> {
        self.get(field).and_then(FieldValue::as_file)
    }

    /// Missing entries and blank values both count as blank.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::is_blank).unwrap_or(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
