use serde_json::json;
use tokio::time::Instant;

use super::common::*;
use crate::forms::application::fields;

#[tokio::test(start_paused = true)]
async fn submission_completes_once_after_the_configured_delay() {
    let (submitter, sink) = submitter(400);
    let values = valid_application_values();

    let started = Instant::now();
    let receipt = submitter
        .submit("experienced-application", &values)
        .await
        .expect("submission succeeds");

    assert!(started.elapsed() >= submitter.delay());
    assert_eq!(receipt.form, "experienced-application");
    assert_eq!(sink.receipts(), vec![receipt]);
}

#[tokio::test(start_paused = true)]
async fn receipt_payload_echoes_the_value_bag() {
    let (submitter, _sink) = submitter(400);
    let values = valid_login_values();

    let receipt = submitter
        .submit("login", &values)
        .await
        .expect("submission succeeds");

    assert_eq!(
        receipt.payload,
        json!({
            "email": "user@example.com",
            "password": "Abcdef1!",
        })
    );
}

#[tokio::test(start_paused = true)]
async fn receipt_serializes_typed_values_naturally() {
    let (submitter, _sink) = submitter(10);
    let values = valid_application_values();

    let receipt = submitter
        .submit("experienced-application", &values)
        .await
        .expect("submission succeeds");

    assert_eq!(receipt.payload[fields::NOTICE_PERIOD], json!("30 days"));
    assert_eq!(receipt.payload[fields::SOFT_SKILLS], json!(["Communication"]));
    assert_eq!(
        receipt.payload[fields::RESUME]["name"],
        json!("resume.pdf")
    );

    let pretty = receipt.pretty();
    assert!(pretty.contains("\"dob\""));
    assert!(pretty.contains("Communication"));
}

#[tokio::test(start_paused = true)]
async fn submissions_resolve_in_order() {
    let (submitter, sink) = submitter(100);

    submitter
        .submit("first", &valid_login_values())
        .await
        .expect("first submission");
    submitter
        .submit("second", &valid_login_values())
        .await
        .expect("second submission");

    let forms: Vec<String> = sink
        .receipts()
        .into_iter()
        .map(|receipt| receipt.form)
        .collect();
    assert_eq!(forms, vec!["first".to_string(), "second".to_string()]);
}
