use super::common::*;
use crate::forms::application::fields;
use crate::forms::login;
use crate::forms::value::FieldValue;

#[test]
fn error_map_is_a_pure_function_of_the_value_bag() {
    let session = application_session_with(&valid_application_values());

    let first = session.errors();
    let second = session.errors();
    assert_eq!(first, second);
}

#[test]
fn errors_stay_hidden_until_a_field_is_touched() {
    let mut session = application_session();

    session.set_value(fields::TOTAL_EXPERIENCE, FieldValue::text("abc"));
    assert!(session.errors().contains(fields::TOTAL_EXPERIENCE));
    assert!(session.visible_errors().is_empty());

    session.blur(fields::TOTAL_EXPERIENCE);
    let visible = session.visible_errors();
    assert_eq!(visible.len(), 1);
    assert_eq!(
        visible.get(fields::TOTAL_EXPERIENCE),
        Some("Total Experience must be a number")
    );
}

#[test]
fn failed_submit_attempt_reveals_every_error() {
    let mut session = application_session();

    let errors = session
        .begin_submit()
        .expect_err("empty form must not submit");
    assert!(!errors.is_empty());
    assert!(!session.is_submitting());

    // After the attempt, untouched fields surface their errors too.
    assert_eq!(session.visible_errors().len(), errors.len());
}

#[test]
fn successful_submit_snapshots_values_and_sets_the_flag() {
    let values = valid_application_values();
    let mut session = application_session_with(&values);

    let snapshot = session.begin_submit().expect("valid form submits");
    assert!(session.is_submitting());
    assert_eq!(&snapshot, session.values());

    session.finish_submit();
    assert!(!session.is_submitting());
    // The application form keeps its values after submission.
    assert_eq!(session.values().text(fields::NOTICE_PERIOD), Some("30 days"));
}

#[test]
fn reset_after_submit_clears_values_and_touched_state() {
    let mut session = login_session();
    for (field, value) in valid_login_values().iter() {
        session.set_value(field, value.clone());
        session.blur(field);
    }

    session.begin_submit().expect("valid login submits");
    session.finish_submit_and_reset();

    assert!(!session.is_submitting());
    assert!(session.values().is_empty());
    assert!(!session.is_touched(login::fields::EMAIL));
    assert!(!session.submit_attempted());
    assert!(session.visible_errors().is_empty());
}

#[test]
fn reset_field_restores_the_initial_value_without_touching() {
    let mut session = application_session();

    session.set_value(fields::OTHER_EDUCATION, FieldValue::text("Bootcamp"));
    session.blur(fields::OTHER_EDUCATION);
    assert!(session.is_touched(fields::OTHER_EDUCATION));

    session.reset_field(fields::OTHER_EDUCATION);
    assert!(session.values().get(fields::OTHER_EDUCATION).is_none());
    assert!(!session.is_touched(fields::OTHER_EDUCATION));

    // Tag fields declare an initial empty list and return to it.
    session.set_value(fields::TECHNICAL_SKILLS, FieldValue::tags(["Python"]));
    session.reset_field(fields::TECHNICAL_SKILLS);
    assert_eq!(
        session.values().tags(fields::TECHNICAL_SKILLS),
        Some(&[][..])
    );
}
