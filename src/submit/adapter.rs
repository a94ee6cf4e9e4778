// Submission Adapter - normalizes transport results for the state machine
//
// The state machine only ever sees `{ success, message }`. Transport failures
// of any kind are caught here and mapped to a generic retry message; nothing
// propagates upward.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::server::{BoundaryResponse, SubmissionBoundary};
use crate::submit::payload::SubmissionPayload;

/// Shown when the transport itself fails; the real cause goes to the log only.
pub const MSG_GENERIC_RETRY: &str =
    "Something went wrong while sending your inquiry. Please try again in a moment.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

/// Normalized submission result. `detail` carries diagnostic metadata for the
/// caller to log; it is never shown to the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
    pub detail: Option<String>,
}

impl SubmitOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            detail: None,
        }
    }

    pub fn failure(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            detail,
        }
    }
}

/// The one hop between the form controller and the submission boundary.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn send(&self, payload: SubmissionPayload) -> Result<BoundaryResponse, TransportError>;
}

/// In-process transport that invokes the boundary directly, the way a server
/// action is called from the page.
pub struct LocalTransport {
    boundary: Arc<SubmissionBoundary>,
    remote_addr: String,
}

impl LocalTransport {
    pub fn new(boundary: Arc<SubmissionBoundary>, remote_addr: impl Into<String>) -> Self {
        Self {
            boundary,
            remote_addr: remote_addr.into(),
        }
    }
}

#[async_trait]
impl SubmissionTransport for LocalTransport {
    async fn send(&self, payload: SubmissionPayload) -> Result<BoundaryResponse, TransportError> {
        Ok(self.boundary.handle(&payload, &self.remote_addr).await)
    }
}

/// Serializes form data into the transport payload, invokes the transport,
/// and interprets its result. Infallible from the caller's point of view.
pub struct SubmissionAdapter {
    transport: Arc<dyn SubmissionTransport>,
}

impl SubmissionAdapter {
    pub fn new(transport: Arc<dyn SubmissionTransport>) -> Self {
        Self { transport }
    }

    pub async fn submit(&self, payload: SubmissionPayload) -> SubmitOutcome {
        match self.transport.send(payload).await {
            Ok(response) => {
                let detail = response
                    .errors
                    .as_ref()
                    .map(|errors| format!("boundary field errors: {errors:?}"));
                SubmitOutcome {
                    success: response.success,
                    message: response.message,
                    detail,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "submission transport failed");
                SubmitOutcome::failure(MSG_GENERIC_RETRY, Some(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::types::FormFields;

    struct FailingTransport;

    #[async_trait]
    impl SubmissionTransport for FailingTransport {
        async fn send(
            &self,
            _payload: SubmissionPayload,
        ) -> Result<BoundaryResponse, TransportError> {
            Err(TransportError::Network("connection refused".to_string()))
        }
    }

    struct EchoTransport;

    #[async_trait]
    impl SubmissionTransport for EchoTransport {
        async fn send(
            &self,
            _payload: SubmissionPayload,
        ) -> Result<BoundaryResponse, TransportError> {
            Ok(BoundaryResponse::success("Thank you!"))
        }
    }

    #[tokio::test]
    async fn transport_errors_become_generic_failures() {
        let adapter = SubmissionAdapter::new(Arc::new(FailingTransport));
        let outcome = adapter
            .submit(SubmissionPayload::from_fields(FormFields::default()))
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, MSG_GENERIC_RETRY);
        assert!(outcome.detail.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn boundary_responses_pass_through() {
        let adapter = SubmissionAdapter::new(Arc::new(EchoTransport));
        let outcome = adapter
            .submit(SubmissionPayload::from_fields(FormFields::default()))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "Thank you!");
        assert_eq!(outcome.detail, None);
    }
}
