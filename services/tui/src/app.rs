//! Renderer state machine for one form: keyboard focus, per-control editing,
//! touched tracking on blur, conditional reveal, and submission polling.
//!
//! Kept free of terminal handles so the whole flow can be driven by synthetic
//! key events in tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use careers_intake::forms::{
    ControlKind, FieldSpec, FieldValue, FormDefinition, FormSession, MemorySink,
    SubmissionReceipt, SubmitError, Submitter,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::oneshot;

/// What currently owns the keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Focus {
    Field(String),
    Submit,
}

pub(crate) struct FormApp {
    session: FormSession,
    focus: Focus,
    /// Char-offset cursor per text-like field.
    cursors: BTreeMap<String, usize>,
    /// Pending (uncommitted) tag text per tag picker.
    tag_drafts: BTreeMap<String, String>,
    submitter: Arc<Submitter<MemorySink>>,
    pending: Option<oneshot::Receiver<Result<SubmissionReceipt, SubmitError>>>,
    receipt: Option<SubmissionReceipt>,
    status: String,
    should_quit: bool,
    reset_on_submit: bool,
}

impl FormApp {
    pub(crate) fn new(
        definition: FormDefinition,
        delay: Duration,
        reset_on_submit: bool,
    ) -> Self {
        let session = FormSession::new(definition);
        let submitter = Arc::new(Submitter::new(delay, Arc::new(MemorySink::default())));
        let mut app = Self {
            session,
            focus: Focus::Submit,
            cursors: BTreeMap::new(),
            tag_drafts: BTreeMap::new(),
            submitter,
            pending: None,
            receipt: None,
            status: "Tab/Up/Down: move | Left/Right: choose | Enter: add tag / submit | Esc: quit"
                .to_string(),
            should_quit: false,
            reset_on_submit,
        };
        if let Some(first) = app.focus_ring().into_iter().next() {
            app.focus = first;
        }
        app
    }

    pub(crate) fn session(&self) -> &FormSession {
        &self.session
    }

    pub(crate) fn focus(&self) -> &Focus {
        &self.focus
    }

    pub(crate) fn status(&self) -> &str {
        &self.status
    }

    pub(crate) fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn cursor(&self, field: &str) -> usize {
        self.cursors.get(field).copied().unwrap_or(0)
    }

    pub(crate) fn tag_draft(&self, field: &str) -> &str {
        self.tag_drafts.get(field).map(String::as_str).unwrap_or("")
    }

    /// Fields visible under the current value bag, in declaration order.
    pub(crate) fn visible_fields(&self) -> Vec<FieldSpec> {
        self.session
            .definition()
            .fields
            .iter()
            .filter(|field| field.is_shown(self.session.values()))
            .cloned()
            .collect()
    }

    fn focus_ring(&self) -> Vec<Focus> {
        let mut ring: Vec<Focus> = self
            .visible_fields()
            .into_iter()
            .map(|field| Focus::Field(field.key))
            .collect();
        ring.push(Focus::Submit);
        ring
    }

    fn control(&self, field: &str) -> Option<ControlKind> {
        self.session
            .definition()
            .field(field)
            .map(|spec| spec.control.clone())
    }

    /// The editable text behind the focused control. File pickers edit the
    /// path of the stored reference.
    fn field_text(&self, field: &str) -> String {
        match self.control(field) {
            Some(ControlKind::FilePicker) => self
                .session
                .values()
                .file(field)
                .map(|reference| reference.path.display().to_string())
                .unwrap_or_default(),
            _ => self
                .session
                .values()
                .text(field)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn store_text(&mut self, field: &str, text: String) {
        match self.control(field) {
            Some(ControlKind::FilePicker) => {
                if text.trim().is_empty() {
                    self.session.clear_value(field);
                } else {
                    self.session.set_value(field, FieldValue::file(text));
                }
            }
            _ => self.session.set_value(field, FieldValue::Text(text)),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if self.receipt.is_some() && !matches!(key.code, KeyCode::Esc) {
            // Any key other than Esc dismisses the receipt panel and resumes
            // editing.
            self.receipt = None;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left => self.handle_left(),
            KeyCode::Right => self.handle_right(),
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.handle_char(c)
            }
            _ => {}
        }
    }

    fn move_focus(&mut self, step: isize) {
        if let Focus::Field(field) = self.focus.clone() {
            self.leave_field(&field);
        }
        let ring = self.focus_ring();
        if ring.is_empty() {
            return;
        }
        let current = ring
            .iter()
            .position(|entry| *entry == self.focus)
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(ring.len() as isize) as usize;
        self.focus = ring[next].clone();
    }

    /// Blur: commit any pending tag draft and mark the field touched.
    fn leave_field(&mut self, field: &str) {
        if matches!(self.control(field), Some(ControlKind::TagPicker { .. })) {
            self.commit_tag_draft(field);
        }
        self.session.blur(field);
    }

    fn handle_char(&mut self, c: char) {
        let Focus::Field(field) = self.focus.clone() else {
            return;
        };
        match self.control(&field) {
            Some(ControlKind::TagPicker { .. }) => {
                self.tag_drafts.entry(field).or_default().push(c);
            }
            Some(ControlKind::Select { .. }) | None => {}
            Some(_) => self.insert_char(&field, c),
        }
    }

    fn insert_char(&mut self, field: &str, c: char) {
        let text = self.field_text(field);
        let cursor = self.cursor(field).min(text.chars().count());
        let byte = byte_offset(&text, cursor);
        let mut updated = text;
        updated.insert(byte, c);
        self.store_text(field, updated);
        self.cursors.insert(field.to_string(), cursor + 1);
    }

    fn handle_backspace(&mut self) {
        let Focus::Field(field) = self.focus.clone() else {
            return;
        };
        match self.control(&field) {
            Some(ControlKind::TagPicker { .. }) => {
                let popped = self
                    .tag_drafts
                    .get_mut(&field)
                    .and_then(String::pop)
                    .is_some();
                if !popped {
                    // Empty draft: remove the most recent tag instead.
                    let mut tags = self
                        .session
                        .values()
                        .tags(&field)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default();
                    tags.pop();
                    self.session.set_value(&field, FieldValue::Tags(tags));
                }
            }
            Some(ControlKind::Select { .. }) | None => {}
            Some(_) => {
                let text = self.field_text(&field);
                let cursor = self.cursor(&field).min(text.chars().count());
                if cursor == 0 {
                    return;
                }
                let start = byte_offset(&text, cursor - 1);
                let end = byte_offset(&text, cursor);
                let mut updated = text;
                updated.replace_range(start..end, "");
                self.store_text(&field, updated);
                self.cursors.insert(field, cursor - 1);
            }
        }
    }

    fn handle_left(&mut self) {
        let Focus::Field(field) = self.focus.clone() else {
            return;
        };
        match self.control(&field) {
            Some(ControlKind::Select { options }) => self.cycle_select(&field, &options, -1),
            Some(ControlKind::TagPicker { .. }) | None => {}
            Some(_) => {
                let cursor = self.cursor(&field);
                if cursor > 0 {
                    self.cursors.insert(field, cursor - 1);
                }
            }
        }
    }

    fn handle_right(&mut self) {
        let Focus::Field(field) = self.focus.clone() else {
            return;
        };
        match self.control(&field) {
            Some(ControlKind::Select { options }) => self.cycle_select(&field, &options, 1),
            Some(ControlKind::TagPicker { .. }) | None => {}
            Some(_) => {
                let text = self.field_text(&field);
                let cursor = self.cursor(&field);
                if cursor < text.chars().count() {
                    self.cursors.insert(field, cursor + 1);
                }
            }
        }
    }

    fn cycle_select(&mut self, field: &str, options: &[String], step: isize) {
        if options.is_empty() {
            return;
        }
        let shown_before = self.shown_keys();
        let selected = self
            .session
            .values()
            .text(field)
            .and_then(|value| options.iter().position(|option| option == value));
        let next = match selected {
            Some(index) => (index as isize + step).rem_euclid(options.len() as isize) as usize,
            None if step >= 0 => 0,
            None => options.len() - 1,
        };
        self.session
            .set_value(field, FieldValue::text(options[next].clone()));
        self.apply_reveals(&shown_before);
    }

    fn shown_keys(&self) -> Vec<String> {
        self.visible_fields()
            .into_iter()
            .map(|field| field.key)
            .collect()
    }

    /// Reset fields that just became visible to their declared initial value.
    /// Revealing never marks a field touched.
    fn apply_reveals(&mut self, shown_before: &[String]) {
        let revealed: Vec<String> = self
            .shown_keys()
            .into_iter()
            .filter(|key| !shown_before.contains(key))
            .collect();
        for field in revealed {
            self.session.reset_field(&field);
            self.cursors.remove(&field);
            self.tag_drafts.remove(&field);
        }
    }

    fn handle_enter(&mut self) {
        match self.focus.clone() {
            Focus::Submit => self.attempt_submit(),
            Focus::Field(field) => match self.control(&field) {
                Some(ControlKind::TagPicker { .. }) => self.commit_tag_draft(&field),
                Some(ControlKind::TextArea) => self.insert_char(&field, '\n'),
                _ => self.move_focus(1),
            },
        }
    }

    fn commit_tag_draft(&mut self, field: &str) {
        let draft = self
            .tag_drafts
            .remove(field)
            .map(|draft| draft.trim().to_string())
            .unwrap_or_default();
        if draft.is_empty() {
            return;
        }
        let mut tags = self
            .session
            .values()
            .tags(field)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        if !tags.contains(&draft) {
            tags.push(draft);
        }
        self.session.set_value(field, FieldValue::Tags(tags));
    }

    fn attempt_submit(&mut self) {
        if self.session.is_submitting() {
            // The submit control is disabled for the duration of the delay.
            return;
        }

        match self.session.begin_submit() {
            Err(errors) => {
                self.status = format!("Please fix {} validation error(s)", errors.len());
            }
            Ok(snapshot) => {
                let (tx, rx) = oneshot::channel();
                let submitter = self.submitter.clone();
                let form = self.session.definition().name.clone();
                tokio::spawn(async move {
                    let result = submitter.submit(&form, &snapshot).await;
                    let _ = tx.send(result);
                });
                self.pending = Some(rx);
                self.status = "Submitting".to_string();
            }
        }
    }

    /// Check whether the in-flight submission has resolved.
    pub(crate) fn poll_submission(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(receipt)) => {
                self.pending = None;
                if self.reset_on_submit {
                    self.session.finish_submit_and_reset();
                    self.cursors.clear();
                    self.tag_drafts.clear();
                } else {
                    self.session.finish_submit();
                }
                self.status = format!("Submitted {}", receipt.form);
                self.receipt = Some(receipt);
            }
            Ok(Err(err)) => {
                self.pending = None;
                self.session.finish_submit();
                self.status = format!("Submission failed: {err}");
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.session.finish_submit();
                self.status = "Submission task ended unexpectedly".to_string();
            }
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use careers_intake::forms::application::{self, fields, EDUCATION_OTHER};
    use careers_intake::forms::{login, FieldValue};
    use crossterm::event::{KeyCode, KeyEvent};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn application_app() -> FormApp {
        FormApp::new(application::definition(), Duration::from_millis(10), false)
    }

    fn type_text(app: &mut FormApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn starts_focused_on_the_first_field() {
        let app = application_app();
        assert_eq!(app.focus(), &Focus::Field(fields::DOB.to_string()));
    }

    #[test]
    fn typing_mutates_the_value_bag_without_touching() {
        let mut app = application_app();
        type_text(&mut app, "1990-01-01");

        assert_eq!(app.session().values().text(fields::DOB), Some("1990-01-01"));
        assert!(!app.session().is_touched(fields::DOB));
        assert!(app.session().visible_errors().is_empty());
    }

    #[test]
    fn leaving_a_field_marks_it_touched_and_reveals_its_error() {
        let mut app = application_app();
        type_text(&mut app, "not a date");
        app.handle_key(key(KeyCode::Tab));

        assert!(app.session().is_touched(fields::DOB));
        assert_eq!(
            app.session().visible_errors().get(fields::DOB),
            Some("Date of Birth must be a valid date")
        );
        // The next field has not been touched, so its error stays hidden.
        assert!(!app
            .session()
            .visible_errors()
            .contains(fields::TOTAL_EXPERIENCE));
    }

    #[test]
    fn selecting_other_education_reveals_the_dependent_field_untouched() {
        let mut app = application_app();

        assert!(!app
            .visible_fields()
            .iter()
            .any(|field| field.key == fields::OTHER_EDUCATION));

        app.session
            .set_value(fields::HIGHEST_EDUCATION, FieldValue::text(EDUCATION_OTHER));
        // Visibility is derived from the value bag.
        assert!(app
            .visible_fields()
            .iter()
            .any(|field| field.key == fields::OTHER_EDUCATION));
        assert!(!app.session().is_touched(fields::OTHER_EDUCATION));
    }

    #[test]
    fn cycling_a_select_sets_the_value_and_resets_revealed_fields() {
        let mut app = application_app();
        // Focus the education select.
        while app.focus() != &Focus::Field(fields::HIGHEST_EDUCATION.to_string()) {
            app.handle_key(key(KeyCode::Tab));
        }

        // Cycle backwards: wraps to the last option, "Other".
        app.handle_key(key(KeyCode::Left));
        assert_eq!(
            app.session().values().text(fields::HIGHEST_EDUCATION),
            Some(EDUCATION_OTHER)
        );
        assert!(app
            .visible_fields()
            .iter()
            .any(|field| field.key == fields::OTHER_EDUCATION));
        assert!(!app.session().is_touched(fields::OTHER_EDUCATION));
    }

    #[test]
    fn tag_picker_commits_drafts_and_pops_tags() {
        let mut app = application_app();
        while app.focus() != &Focus::Field(fields::SOFT_SKILLS.to_string()) {
            app.handle_key(key(KeyCode::Tab));
        }

        type_text(&mut app, "Communication");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "Teamwork");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.session().values().tags(fields::SOFT_SKILLS),
            Some(&["Communication".to_string(), "Teamwork".to_string()][..])
        );

        // Backspace with an empty draft removes the last tag.
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            app.session().values().tags(fields::SOFT_SKILLS),
            Some(&["Communication".to_string()][..])
        );
    }

    #[test]
    fn invalid_submit_reports_errors_and_stays_idle() {
        let mut app = application_app();
        while app.focus() != &Focus::Submit {
            app.handle_key(key(KeyCode::Tab));
        }
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.session().is_submitting());
        assert!(app.status().contains("validation error"));
        // The attempt reveals errors on untouched fields too.
        assert!(app.session().visible_errors().contains(fields::RESUME));
    }

    #[tokio::test]
    async fn valid_submit_disables_the_control_then_yields_a_receipt() {
        let mut app = FormApp::new(login::definition(), Duration::from_millis(10), true);
        app.session
            .set_value(login::fields::EMAIL, FieldValue::text("user@example.com"));
        app.session
            .set_value(login::fields::PASSWORD, FieldValue::text("Abcdef1!"));

        while app.focus() != &Focus::Submit {
            app.handle_key(key(KeyCode::Tab));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session().is_submitting());

        // A second Enter while in flight is ignored.
        app.handle_key(key(KeyCode::Enter));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while app.receipt().is_none() {
            assert!(tokio::time::Instant::now() < deadline, "submission timed out");
            app.poll_submission();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        assert!(!app.session().is_submitting());
        let receipt = app.receipt().expect("receipt present");
        assert_eq!(receipt.form, "login");
        assert_eq!(receipt.payload["email"], "user@example.com");
        // The login form clears its value bag after submission.
        assert!(app.session().values().is_empty());
    }
}
