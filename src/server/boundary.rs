// Submission Boundary - stateless per call, everything caught here
//
// Pipeline: rate limit -> independent re-validation -> notification send.
// Every failure mode is converted to `{ success, message }`; internal
// diagnostics are logged server-side and never shown to the requester.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::form::types::{Field, FormFields, Step};
use crate::form::validator::{validate_step, MSG_CAPTCHA_REQUIRED};
use crate::notify::{EmailMessage, NotificationService};
use crate::registry;
use crate::server::rate_limit::RateLimit;
use crate::submit::payload::SubmissionPayload;
use crate::telemetry::generate_correlation_id;

pub const MSG_SUCCESS: &str = "Thank you for your inquiry! I'll get back to you within 24 hours.";
pub const MSG_VALIDATION: &str = "Please correct the highlighted fields and try again.";

fn rate_limited_message(minutes: i64) -> String {
    format!("Too many submission attempts. Please try again in {minutes} minute(s).")
}

fn not_configured_message(fallback_contact: &str) -> String {
    format!(
        "The inquiry service is not configured yet. Please email me directly at {fallback_contact}."
    )
}

fn delivery_failed_message(fallback_contact: &str) -> String {
    format!(
        "Something went wrong while sending your inquiry. Please try again, or email me directly at {fallback_contact}."
    )
}

/// Wire response of the boundary. `errors` appears only on server-side
/// validation failure and mirrors the client validator's per-field contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl BoundaryResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn invalid(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            success: false,
            message: MSG_VALIDATION.to_string(),
            errors: Some(errors),
        }
    }
}

/// Addresses the boundary sends from and to, plus the address surfaced to
/// users when automated delivery is unavailable.
#[derive(Debug, Clone)]
pub struct BoundaryAddresses {
    pub from: String,
    pub to: String,
    pub fallback_contact: String,
}

/// The single server-side entry point for inquiry submissions.
pub struct SubmissionBoundary {
    rate_limit: Arc<dyn RateLimit>,
    // None means the notification API key was absent at startup; submissions
    // are then always answered with the not-configured message.
    notifier: Option<Arc<dyn NotificationService>>,
    addresses: BoundaryAddresses,
}

impl SubmissionBoundary {
    pub fn new(
        rate_limit: Arc<dyn RateLimit>,
        notifier: Option<Arc<dyn NotificationService>>,
        addresses: BoundaryAddresses,
    ) -> Self {
        if notifier.is_none() {
            tracing::warn!("notification API key missing; submissions will report not-configured");
        }
        Self {
            rate_limit,
            notifier,
            addresses,
        }
    }

    pub async fn handle(&self, payload: &SubmissionPayload, remote_addr: &str) -> BoundaryResponse {
        let correlation_id = generate_correlation_id();
        let email = payload.field(Field::Email).unwrap_or_default().trim();
        let identifier = if email.is_empty() { remote_addr } else { email };

        let decision = self.rate_limit.check(identifier);
        if !decision.allowed {
            let minutes = decision.minutes_until_reset();
            tracing::warn!(
                correlation_id = %correlation_id,
                identifier,
                minutes,
                "submission rejected by rate limiter"
            );
            return BoundaryResponse::failure(rate_limited_message(minutes));
        }

        let fields = parse_fields(payload);
        let errors = revalidate(&fields);
        if !errors.is_empty() {
            tracing::info!(
                correlation_id = %correlation_id,
                error_count = errors.len(),
                "submission rejected by server-side validation"
            );
            return BoundaryResponse::invalid(errors);
        }

        let Some(notifier) = &self.notifier else {
            tracing::error!(correlation_id = %correlation_id, "submission dropped: service not configured");
            return BoundaryResponse::failure(not_configured_message(
                &self.addresses.fallback_contact,
            ));
        };

        let message = compose_notification(&fields, &self.addresses);
        match notifier.send(&message).await {
            Ok(delivery_id) => {
                tracing::info!(
                    correlation_id = %correlation_id,
                    delivery_id = %delivery_id.0,
                    "inquiry notification delivered"
                );
                BoundaryResponse::success(MSG_SUCCESS)
            }
            Err(err) => {
                tracing::error!(correlation_id = %correlation_id, error = %err, "inquiry notification failed");
                BoundaryResponse::failure(delivery_failed_message(
                    &self.addresses.fallback_contact,
                ))
            }
        }
    }
}

/// Reconstruct typed fields from the flat payload. Absent or malformed parts
/// degrade to empty values; validation decides what that means.
fn parse_fields(payload: &SubmissionPayload) -> FormFields {
    let text = |field: Field| payload.field(field).unwrap_or_default().to_string();
    let list = |field: Field| {
        payload
            .field(field)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
    };

    FormFields {
        name: text(Field::Name),
        email: text(Field::Email),
        company: text(Field::Company),
        phone: text(Field::Phone),
        project_type: text(Field::ProjectType),
        budget: text(Field::Budget),
        timeline: text(Field::Timeline),
        description: text(Field::Description),
        technologies: list(Field::Technologies),
        features: list(Field::Features),
        additional_info: text(Field::AdditionalInfo),
        files: payload.attachments().to_vec(),
        preferred_contact: text(Field::PreferredContact),
        urgency: text(Field::Urgency),
        hear_about: text(Field::HearAbout),
        captcha_token: text(Field::CaptchaToken),
    }
}

/// Server-side re-validation, independent of whatever the client checked:
/// all step rules, the captcha token, and the attachment policy (allow-list
/// plus the per-file size cap, which is enforced only here).
fn revalidate(fields: &FormFields) -> BTreeMap<String, Vec<String>> {
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut push = |field: Field, message: String| {
        errors.entry(field.wire_name().to_string()).or_default().push(message);
    };

    for step in [Step::Basics, Step::Project, Step::Requirements, Step::Review] {
        for (field, message) in validate_step(step, fields) {
            push(field, message);
        }
    }

    if fields.captcha_token.trim().is_empty() {
        push(Field::CaptchaToken, MSG_CAPTCHA_REQUIRED.to_string());
    }

    for file in &fields.files {
        if !registry::is_allowed_attachment(&file.file_name, &file.mime_type) {
            push(
                Field::Files,
                format!("Attachment {} has an unsupported file type", file.file_name),
            );
        }
        if file.exceeds_size_cap() {
            push(
                Field::Files,
                format!("Attachment {} exceeds the 10 MB limit", file.file_name),
            );
        }
    }

    errors
}

fn compose_notification(fields: &FormFields, addresses: &BoundaryAddresses) -> EmailMessage {
    let mut lines = vec![
        format!("Name: {}", fields.name),
        format!("Email: {}", fields.email),
    ];
    if !fields.company.is_empty() {
        lines.push(format!("Company: {}", fields.company));
    }
    if !fields.phone.is_empty() {
        lines.push(format!("Phone: {}", fields.phone));
    }
    lines.push(format!("Project type: {}", fields.project_type));
    lines.push(format!("Budget: {}", fields.budget));
    lines.push(format!("Timeline: {}", fields.timeline));
    lines.push(format!("Description: {}", fields.description));
    if !fields.technologies.is_empty() {
        lines.push(format!("Technologies: {}", fields.technologies.join(", ")));
    }
    if !fields.features.is_empty() {
        lines.push(format!("Features: {}", fields.features.join(", ")));
    }
    if !fields.additional_info.is_empty() {
        lines.push(format!("Additional info: {}", fields.additional_info));
    }
    if !fields.preferred_contact.is_empty() {
        lines.push(format!("Preferred contact: {}", fields.preferred_contact));
    }
    if !fields.urgency.is_empty() {
        lines.push(format!("Urgency: {}", fields.urgency));
    }
    if !fields.hear_about.is_empty() {
        lines.push(format!("Heard about via: {}", fields.hear_about));
    }
    if !fields.files.is_empty() {
        let names: Vec<&str> = fields.files.iter().map(|f| f.file_name.as_str()).collect();
        lines.push(format!("Attachments ({}): {}", names.len(), names.join(", ")));
    }

    EmailMessage {
        from: addresses.from.clone(),
        to: addresses.to.clone(),
        reply_to: (!fields.email.is_empty()).then(|| fields.email.clone()),
        subject: format!("New project inquiry from {}", fields.name),
        body: lines.join("\n"),
    }
}
