// Form Session - async driver around the state machine
//
// One session per form instance. All transitions are synchronous except
// `submit`, which performs the single async adapter call; the `Submitting`
// status is the double-submit guard while that call is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::form::machine::{FormMachine, SubmitGate};
use crate::form::types::{FormFields, FormUpdate, Step, SubmissionStatus};
use crate::form::validator::ValidationErrors;
use crate::submit::{SubmissionAdapter, SubmissionPayload, SubmitOutcome};

/// Delay before a successful submission resets the form to defaults.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct FormSession {
    machine: Arc<Mutex<FormMachine>>,
    adapter: Arc<SubmissionAdapter>,
    reset_delay: Duration,
}

impl FormSession {
    pub fn new(adapter: Arc<SubmissionAdapter>) -> Self {
        Self::with_reset_delay(adapter, DEFAULT_RESET_DELAY)
    }

    pub fn with_reset_delay(adapter: Arc<SubmissionAdapter>, reset_delay: Duration) -> Self {
        Self {
            machine: Arc::new(Mutex::new(FormMachine::new())),
            adapter,
            reset_delay,
        }
    }

    pub async fn update(&self, update: FormUpdate) {
        self.machine.lock().await.update(update);
    }

    pub async fn next_step(&self) -> bool {
        self.machine.lock().await.next_step()
    }

    pub async fn prev_step(&self) {
        self.machine.lock().await.prev_step();
    }

    pub async fn current_step(&self) -> Step {
        self.machine.lock().await.current_step()
    }

    pub async fn fields(&self) -> FormFields {
        self.machine.lock().await.fields().clone()
    }

    pub async fn errors(&self) -> ValidationErrors {
        self.machine.lock().await.errors().clone()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.machine.lock().await.status().clone()
    }

    /// Run one submission attempt. A gated rejection (`Err`) means the
    /// adapter was never invoked. On success the state resets to defaults
    /// after the configured delay, unless a newer attempt supersedes it.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitGate> {
        let fields = {
            let mut machine = self.machine.lock().await;
            machine.begin_submit()?
        };

        // The lock is released during the async call so the UI can keep
        // reading state; `Submitting` blocks any interleaved submit.
        let payload = SubmissionPayload::from_fields(fields);
        let outcome = self.adapter.submit(payload).await;

        let mut machine = self.machine.lock().await;
        if outcome.success {
            let generation = machine.submit_succeeded(&outcome.message);
            drop(machine);
            self.schedule_reset(generation);
        } else {
            machine.submit_failed(&outcome.message);
        }

        Ok(outcome)
    }

    fn schedule_reset(&self, generation: u64) {
        let machine = Arc::clone(&self.machine);
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            machine.lock().await.reset_if_generation(generation);
        });
    }
}
