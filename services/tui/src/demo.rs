//! Scripted, non-interactive walkthrough of both forms for environments
//! without a TTY: one rejected validation pass, then a full submission.

use std::sync::Arc;

use careers_intake::config::AppConfig;
use careers_intake::error::AppError;
use careers_intake::forms::application::{self, fields, EDUCATION_TECHNICAL};
use careers_intake::forms::{login, EchoSink, FieldValue, FormSession, Submitter};
use careers_intake::telemetry;
use clap::Args;

use crate::cli::FormChoice;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the configured submission delay in milliseconds
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,
    /// Only run the named form
    #[arg(long, value_enum)]
    pub(crate) form: Option<FormChoice>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { delay_ms, form } = args;

    let mut config = AppConfig::load()?;
    if let Some(delay_ms) = delay_ms {
        config.submission.delay_ms = delay_ms;
    }
    telemetry::init(&config.telemetry)?;

    let submitter = Submitter::new(config.submission.delay(), Arc::new(EchoSink));

    match form {
        Some(FormChoice::Application) => application_demo(&submitter).await?,
        Some(FormChoice::Login) => login_demo(&submitter).await?,
        None => {
            application_demo(&submitter).await?;
            println!();
            login_demo(&submitter).await?;
        }
    }

    Ok(())
}

async fn application_demo(submitter: &Submitter<EchoSink>) -> Result<(), AppError> {
    println!("Experienced application demo");

    let mut session = FormSession::new(application::definition());
    session.set_value(fields::TOTAL_EXPERIENCE, FieldValue::text("50.05"));
    session.set_value(fields::RELEVANT_EXPERIENCE, FieldValue::text("12.345"));

    match session.begin_submit() {
        Err(errors) => {
            println!("First pass rejected with {} error(s):", errors.len());
            for (field, message) in errors.iter() {
                println!("- {field}: {message}");
            }
        }
        Ok(_) => println!("Unexpectedly valid first pass"),
    }

    println!("\nFilling in valid answers");
    session.set_value(fields::DOB, FieldValue::text("1991-07-22"));
    session.set_value(fields::TOTAL_EXPERIENCE, FieldValue::text("8.5"));
    session.set_value(fields::RELEVANT_EXPERIENCE, FieldValue::text("5.25"));
    session.set_value(
        fields::ACCOMPLISHMENTS,
        FieldValue::text("Rebuilt the billing reconciliation pipeline"),
    );
    session.set_value(
        fields::HIGHEST_EDUCATION,
        FieldValue::text(EDUCATION_TECHNICAL),
    );
    session.set_value(
        fields::TECHNICAL_SKILLS,
        FieldValue::tags(["Python", "PostgreSQL"]),
    );
    session.set_value(
        fields::SOFT_SKILLS,
        FieldValue::tags(["Communication", "Problem Solving"]),
    );
    session.set_value(fields::RESUME, FieldValue::file("docs/resume.pdf"));
    session.set_value(fields::EXPECTED_CTC, FieldValue::text("2200000"));
    session.set_value(fields::CURRENT_CTC, FieldValue::text("1600000"));
    session.set_value(fields::NOTICE_PERIOD, FieldValue::text("45 days"));

    let snapshot = match session.begin_submit() {
        Ok(snapshot) => snapshot,
        Err(errors) => {
            println!("Validation still failing: {errors:?}");
            return Ok(());
        }
    };
    println!(
        "Submit control disabled while the {}ms round trip runs",
        submitter.delay().as_millis()
    );
    submitter.submit(&session.definition().name, &snapshot).await?;
    session.finish_submit();
    println!("Submit control re-enabled; values retained for review");

    Ok(())
}

async fn login_demo(submitter: &Submitter<EchoSink>) -> Result<(), AppError> {
    println!("Login demo");

    let mut session = FormSession::new(login::definition());
    session.set_value(login::fields::EMAIL, FieldValue::text("user@example.com"));
    session.set_value(login::fields::PASSWORD, FieldValue::text("abcdefgh"));

    if let Err(errors) = session.begin_submit() {
        for (field, message) in errors.iter() {
            println!("- {field}: {message}");
        }
    }

    println!("\nRetrying with a compliant password");
    session.set_value(login::fields::PASSWORD, FieldValue::text("Abcdef1!"));
    let snapshot = match session.begin_submit() {
        Ok(snapshot) => snapshot,
        Err(errors) => {
            println!("Validation still failing: {errors:?}");
            return Ok(());
        }
    };
    submitter.submit(&session.definition().name, &snapshot).await?;
    session.finish_submit_and_reset();
    println!(
        "Login form cleared after submit ({} values remain)",
        session.values().len()
    );

    Ok(())
}
