//! Tests for the async submission flow in src/form/session.rs.
//! Testing library/framework: Rust built-in test framework with Tokio async
//! runtime (#[tokio::test]) and its paused clock for the scheduled reset.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use lead_intake::{
    BoundaryResponse, Field, FormFields, FormSession, FormUpdate, Step, SubmissionAdapter,
    SubmissionPayload, SubmissionStatus, SubmissionTransport, SubmitGate, TransportError,
};

/// Transport that records invocations and replies with a canned response.
struct RecordingTransport {
    calls: AtomicUsize,
    response: BoundaryResponse,
}

impl RecordingTransport {
    fn succeeding(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: BoundaryResponse::success(message),
        })
    }
}

#[async_trait]
impl SubmissionTransport for RecordingTransport {
    async fn send(&self, _payload: SubmissionPayload) -> Result<BoundaryResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Transport that always fails at the network level.
struct FailingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl SubmissionTransport for FailingTransport {
    async fn send(&self, _payload: SubmissionPayload) -> Result<BoundaryResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Network("connection reset".to_string()))
    }
}

/// Transport that parks inside `send` until released, to hold the session in
/// the `Submitting` state.
struct BlockingTransport {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl BlockingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl SubmissionTransport for BlockingTransport {
    async fn send(&self, _payload: SubmissionPayload) -> Result<BoundaryResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(BoundaryResponse::success("Thank you!"))
    }
}

fn session_with(transport: Arc<dyn SubmissionTransport>) -> FormSession {
    FormSession::with_reset_delay(
        Arc::new(SubmissionAdapter::new(transport)),
        Duration::from_secs(5),
    )
}

async fn fill_through_review(session: &FormSession, captcha: Option<&str>) {
    session
        .update(FormUpdate {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        })
        .await;
    assert!(session.next_step().await);
    session
        .update(FormUpdate {
            project_type: Some("Web Application".to_string()),
            budget: Some("$5,000 - $10,000".to_string()),
            timeline: Some("1 - 3 months".to_string()),
            description: Some("A marketing site with a booking flow.".to_string()),
            ..Default::default()
        })
        .await;
    assert!(session.next_step().await);
    assert!(session.next_step().await);
    assert_eq!(session.current_step().await, Step::Review);
    if let Some(token) = captcha {
        session
            .update(FormUpdate {
                captcha_token: Some(token.to_string()),
                ..Default::default()
            })
            .await;
    }
}

#[tokio::test]
async fn missing_captcha_never_reaches_the_transport() {
    let transport = RecordingTransport::succeeding("Thank you!");
    let session = session_with(transport.clone());
    fill_through_review(&session, None).await;

    assert_eq!(session.submit().await, Err(SubmitGate::CaptchaMissing));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.errors().await.get(&Field::CaptchaToken).map(String::as_str),
        Some("Please complete the security verification")
    );
    assert_eq!(session.status().await, SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn successful_submission_resets_to_defaults_after_the_delay() {
    let transport = RecordingTransport::succeeding("Thank you for your inquiry!");
    let session = session_with(transport.clone());
    fill_through_review(&session, Some("tok123")).await;

    let outcome = session.submit().await.expect("submit should pass the gate");
    assert!(outcome.success);
    assert_eq!(
        session.status().await,
        SubmissionStatus::Succeeded("Thank you for your inquiry!".to_string())
    );
    assert_ne!(session.fields().await, FormFields::default());

    // The scheduled reset fires five seconds after success.
    tokio::time::sleep(Duration::from_millis(5_100)).await;
    assert_eq!(session.fields().await, FormFields::default());
    assert_eq!(session.current_step().await, Step::Basics);
    assert_eq!(session.status().await, SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn reset_does_not_fire_before_the_delay() {
    let transport = RecordingTransport::succeeding("Thanks!");
    let session = session_with(transport);
    fill_through_review(&session, Some("tok123")).await;
    session.submit().await.unwrap();

    tokio::time::sleep(Duration::from_millis(4_900)).await;
    assert!(matches!(
        session.status().await,
        SubmissionStatus::Succeeded(_)
    ));
}

#[tokio::test]
async fn failed_submission_preserves_entered_data_for_retry() {
    let transport = Arc::new(FailingTransport {
        calls: AtomicUsize::new(0),
    });
    let session = session_with(transport.clone());
    fill_through_review(&session, Some("tok123")).await;
    let before = session.fields().await;

    let outcome = session.submit().await.expect("gate should pass");
    assert!(!outcome.success);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert!(matches!(session.status().await, SubmissionStatus::Failed(_)));
    // User stays on step 4 with everything intact.
    assert_eq!(session.current_step().await, Step::Review);
    assert_eq!(session.fields().await, before);

    // Retry goes through once the transport recovers.
    assert!(session.submit().await.is_ok());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let transport = BlockingTransport::new();
    let session = session_with(transport.clone());
    fill_through_review(&session, Some("tok123")).await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    transport.entered.notified().await;
    assert_eq!(session.status().await, SubmissionStatus::Submitting);

    // Second call is rejected without another transport invocation.
    assert_eq!(session.submit().await, Err(SubmitGate::AlreadySubmitting));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    transport.release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(outcome.success);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}
