use std::collections::BTreeSet;

use super::definition::FormDefinition;
use super::rules::ErrorMap;
use super::value::{FieldValue, FormValues};

/// Tracks the live state of one rendered form: the value bag, which fields
/// the user has touched, and whether a submission is in flight.
///
/// Errors are never stored; they are re-derived from the value bag and the
/// rule set on every query.
pub struct FormSession {
    definition: FormDefinition,
    values: FormValues,
    touched: BTreeSet<String>,
    submit_attempted: bool,
    submitting: bool,
}

impl FormSession {
    pub fn new(definition: FormDefinition) -> Self {
        let values = definition.initial_values();
        Self {
            definition,
            values,
            touched: BTreeSet::new(),
            submit_attempted: false,
            submitting: false,
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Mutate the value bag; called on every keystroke or selection.
    pub fn set_value(&mut self, field: &str, value: FieldValue) {
        self.values.set(field, value);
    }

    pub fn clear_value(&mut self, field: &str) {
        self.values.clear_field(field);
    }

    /// Mark a field as touched: focused and left at least once.
    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Reset a conditional field to its declared initial value when it is
    /// revealed, without marking it touched.
    pub fn reset_field(&mut self, field: &str) {
        match self.definition.field(field).and_then(|spec| spec.initial.clone()) {
            Some(initial) => self.values.set(field, initial),
            None => self.values.clear_field(field),
        }
        self.touched.remove(field);
    }

    /// Full error map for the current values.
    pub fn errors(&self) -> ErrorMap {
        self.definition.rules.evaluate(&self.values)
    }

    /// Errors gated on interaction: only touched fields until a submit has
    /// been attempted, then everything.
    pub fn visible_errors(&self) -> ErrorMap {
        let errors = self.errors();
        if self.submit_attempted {
            return errors;
        }
        let mut visible = ErrorMap::default();
        for (field, message) in errors.iter() {
            if self.touched.contains(field) {
                visible.insert(field.clone(), message.clone());
            }
        }
        visible
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate everything and move into the submitting state.
    ///
    /// Returns the value-bag snapshot to hand to the submitter, or the full
    /// error map when validation fails. Callers must not invoke this while a
    /// submission is already in flight; the renderer disables the submit
    /// control for the duration.
    pub fn begin_submit(&mut self) -> Result<FormValues, ErrorMap> {
        self.submit_attempted = true;
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        self.submitting = true;
        Ok(self.values.clone())
    }

    /// Leave the submitting state once the delayed submission resolves.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Leave the submitting state and clear the value bag (login form).
    pub fn finish_submit_and_reset(&mut self) {
        self.submitting = false;
        self.values = self.definition.initial_values();
        self.touched.clear();
        self.submit_attempted = false;
    }
}
