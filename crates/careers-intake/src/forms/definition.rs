use super::rules::{Condition, RuleSet};
use super::value::{FieldValue, FormValues};

/// How a field is edited in the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    TextLine,
    TextArea,
    /// Masked single-line input.
    Secret,
    DateInput,
    NumberInput,
    /// Single choice cycled through the listed options.
    Select { options: Vec<String> },
    /// Tagged-list input accepting both suggested and user-supplied entries.
    TagPicker { suggestions: Vec<String> },
    /// Local file path; the referenced file is never opened.
    FilePicker,
}

/// Declarative description of one form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub control: ControlKind,
    pub placeholder: Option<String>,
    /// Render the field only while the condition holds against the current
    /// values. Revealing a field does not mark it touched.
    pub shown_when: Option<Condition>,
    pub initial: Option<FieldValue>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, control: ControlKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            control,
            placeholder: None,
            shown_when: None,
            initial: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn shown_when(mut self, condition: Condition) -> Self {
        self.shown_when = Some(condition);
        self
    }

    pub fn initial(mut self, value: FieldValue) -> Self {
        self.initial = Some(value);
        self
    }

    pub fn is_shown(&self, values: &FormValues) -> bool {
        self.shown_when
            .as_ref()
            .map(|condition| condition.holds(values))
            .unwrap_or(true)
    }
}

/// A complete form: renderable field specs plus the validation rule set.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub name: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub rules: RuleSet,
}

impl FormDefinition {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Build the value bag a fresh session starts from.
    pub fn initial_values(&self) -> FormValues {
        let mut values = FormValues::new();
        for field in &self.fields {
            if let Some(initial) = &field.initial {
                values.set(field.key.clone(), initial.clone());
            }
        }
        values
    }
}
