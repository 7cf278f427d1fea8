use std::sync::Arc;
use std::time::Duration;

use crate::forms::application::{self, fields};
use crate::forms::login;
use crate::forms::submit::{MemorySink, Submitter};
use crate::forms::value::{FieldValue, FormValues};
use crate::forms::FormSession;

pub(super) fn valid_application_values() -> FormValues {
    let mut values = FormValues::new();
    values.set(fields::DOB, FieldValue::text("1992-05-14"));
    values.set(fields::TOTAL_EXPERIENCE, FieldValue::text("7.5"));
    values.set(fields::RELEVANT_EXPERIENCE, FieldValue::text("4.25"));
    values.set(
        fields::ACCOMPLISHMENTS,
        FieldValue::text("Led the payments platform migration"),
    );
    values.set(fields::HIGHEST_EDUCATION, FieldValue::text("Graduate"));
    values.set(fields::SOFT_SKILLS, FieldValue::tags(["Communication"]));
    values.set(fields::RESUME, FieldValue::file("docs/resume.pdf"));
    values.set(fields::EXPECTED_CTC, FieldValue::text("1800000"));
    values.set(fields::CURRENT_CTC, FieldValue::text("1200000"));
    values.set(fields::NOTICE_PERIOD, FieldValue::text("30 days"));
    values
}

pub(super) fn application_session() -> FormSession {
    FormSession::new(application::definition())
}

pub(super) fn application_session_with(values: &FormValues) -> FormSession {
    let mut session = application_session();
    for (field, value) in values.iter() {
        session.set_value(field, value.clone());
    }
    session
}

pub(super) fn login_session() -> FormSession {
    FormSession::new(login::definition())
}

pub(super) fn valid_login_values() -> FormValues {
    let mut values = FormValues::new();
    values.set(login::fields::EMAIL, FieldValue::text("user@example.com"));
    values.set(login::fields::PASSWORD, FieldValue::text("Abcdef1!"));
    values
}

pub(super) fn submitter(delay_ms: u64) -> (Submitter<MemorySink>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let submitter = Submitter::new(Duration::from_millis(delay_ms), sink.clone());
    (submitter, sink)
}
