// Notification Collaborator - opaque email delivery dependency
//
// The boundary hands over a composed message and gets back a delivery id or
// an error. Provider-side rendering and deliverability are out of scope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier returned by the provider for a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryId(pub String);

/// A composed notification ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("network failure reaching email provider: {0}")]
    Network(String),
    #[error("notification service is not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryId, NotifyError>;
}

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// HTTP-backed notification service posting to the provider's `/emails`
/// endpoint with a bearer key.
pub struct HttpNotificationService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl HttpNotificationService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint; used by tests against a
    /// local mock server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryId, NotifyError> {
        let request = SendRequest {
            from: &message.from,
            to: &message.to,
            reply_to: message.reply_to.as_deref(),
            subject: &message.subject,
            html: &message.body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "email provider rejected notification");
            return Err(NotifyError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: SendResponse = response.json().await?;
        tracing::info!(delivery_id = %body.id, "notification accepted by provider");
        Ok(DeliveryId(body.id))
    }
}
