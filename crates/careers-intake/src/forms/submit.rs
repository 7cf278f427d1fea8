use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::value::FormValues;

/// Outcome of a simulated submission: the serialized value bag, echoed back
/// to whoever is watching the sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub form: String,
    pub payload: serde_json::Value,
}

impl SubmissionReceipt {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}

/// Where completed submissions are presented.
pub trait SubmissionSink: Send + Sync {
    fn deliver(&self, receipt: &SubmissionReceipt) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("submission display unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("failed to serialize form values: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Prints the submitted payload, mirroring the original behavior of echoing
/// the value bag back to the user.
#[derive(Debug, Default, Clone)]
pub struct EchoSink;

impl SubmissionSink for EchoSink {
    fn deliver(&self, receipt: &SubmissionReceipt) -> Result<(), SinkError> {
        println!("Submitted data ({}):\n{}", receipt.form, receipt.pretty());
        Ok(())
    }
}

/// Captures receipts in memory for tests and for renderers that present the
/// receipt themselves.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    receipts: Arc<Mutex<Vec<SubmissionReceipt>>>,
}

impl MemorySink {
    pub fn receipts(&self) -> Vec<SubmissionReceipt> {
        self.receipts.lock().expect("receipt mutex poisoned").clone()
    }
}

impl SubmissionSink for MemorySink {
    fn deliver(&self, receipt: &SubmissionReceipt) -> Result<(), SinkError> {
        self.receipts
            .lock()
            .expect("receipt mutex poisoned")
            .push(receipt.clone());
        Ok(())
    }
}

/// Simulates the network round trip with a fixed delay, then delivers the
/// serialized value bag to the sink.
///
/// Completion is signaled exactly once, after the delay. There is no retry
/// and no cancellation; the session's submitting flag keeps submissions to
/// one in flight at a time.
pub struct Submitter<S> {
    delay: Duration,
    sink: Arc<S>,
}

impl<S: SubmissionSink> Submitter<S> {
    pub fn new(delay: Duration, sink: Arc<S>) -> Self {
        Self { delay, sink }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn submit(
        &self,
        form: &str,
        values: &FormValues,
    ) -> Result<SubmissionReceipt, SubmitError> {
        tokio::time::sleep(self.delay).await;

        let receipt = SubmissionReceipt {
            form: form.to_string(),
            payload: serde_json::to_value(values)?,
        };
        self.sink.deliver(&receipt)?;
        info!(form = %receipt.form, "form submission completed");
        Ok(receipt)
    }
}
