// Core types for the multi-step inquiry form

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::registry;

/// One page of the multi-step form. Linear track, no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Step 1: name, email, company, phone.
    Basics,
    /// Step 2: project type, budget, timeline, description.
    Project,
    /// Step 3: technologies, features, additional info.
    Requirements,
    /// Step 4: attachments, contact preferences, captcha.
    Review,
}

impl Step {
    pub const FIRST: Step = Step::Basics;
    pub const LAST: Step = Step::Review;

    /// 1-based step number as shown in the progress indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::Basics => 1,
            Step::Project => 2,
            Step::Requirements => 3,
            Step::Review => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::Basics),
            2 => Some(Step::Project),
            3 => Some(Step::Requirements),
            4 => Some(Step::Review),
            _ => None,
        }
    }

    /// Next step, clamped at the last step.
    pub fn next(self) -> Step {
        match self {
            Step::Basics => Step::Project,
            Step::Project => Step::Requirements,
            Step::Requirements => Step::Review,
            Step::Review => Step::Review,
        }
    }

    /// Previous step, clamped at the first step.
    pub fn prev(self) -> Step {
        match self {
            Step::Basics => Step::Basics,
            Step::Project => Step::Basics,
            Step::Requirements => Step::Project,
            Step::Review => Step::Requirements,
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Step::FIRST
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

/// Typed field names, used as error-map keys and payload part names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Company,
    Phone,
    ProjectType,
    Budget,
    Timeline,
    Description,
    Technologies,
    Features,
    AdditionalInfo,
    Files,
    PreferredContact,
    Urgency,
    HearAbout,
    CaptchaToken,
}

impl Field {
    /// Name used on the wire (payload parts and the boundary's error map).
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Company => "company",
            Field::Phone => "phone",
            Field::ProjectType => "projectType",
            Field::Budget => "budget",
            Field::Timeline => "timeline",
            Field::Description => "description",
            Field::Technologies => "technologies",
            Field::Features => "features",
            Field::AdditionalInfo => "additionalInfo",
            Field::Files => "files",
            Field::PreferredContact => "preferredContact",
            Field::Urgency => "urgency",
            Field::HearAbout => "hearAbout",
            Field::CaptchaToken => "captchaToken",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("file type not accepted for {file_name} ({mime_type})")]
    UnsupportedType { file_name: String, mime_type: String },
}

/// A user-selected file staged for the submission payload.
///
/// The raw bytes live behind an `Arc` so the staged copy and the outgoing
/// payload share one allocation; a failed submission keeps the staged files
/// intact for retry without duplicating buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub byte_size: u64,
    bytes: Arc<[u8]>,
}

impl Attachment {
    /// Stage a file, enforcing the attachment type allow-list.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let mime_type = mime_type.into();
        if !registry::is_allowed_attachment(&file_name, &mime_type) {
            return Err(AttachmentError::UnsupportedType { file_name, mime_type });
        }
        let byte_size = bytes.len() as u64;
        Ok(Self {
            file_name,
            mime_type,
            byte_size,
            bytes: bytes.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether this file exceeds the stated per-file size cap.
    pub fn exceeds_size_cap(&self) -> bool {
        self.byte_size > registry::MAX_ATTACHMENT_BYTES
    }
}

/// The aggregate field record for all four steps. Created empty at mount,
/// mutated only through the state machine's transitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    // Step 1 - basic info
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    // Step 2 - project details
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub description: String,
    // Step 3 - requirements
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub additional_info: String,
    // Step 4 - files and final details
    pub files: Vec<Attachment>,
    pub preferred_contact: String,
    pub urgency: String,
    pub hear_about: String,
    pub captcha_token: String,
}

/// A partial update to [`FormFields`]. Every member that is `Some` is merged
/// last-write-wins and clears that field's validation error.
#[derive(Debug, Clone, Default)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub additional_info: Option<String>,
    pub files: Option<Vec<Attachment>>,
    pub preferred_contact: Option<String>,
    pub urgency: Option<String>,
    pub hear_about: Option<String>,
    pub captcha_token: Option<String>,
}

impl FormUpdate {
    /// Fields present in this update, in declaration order.
    pub fn touched(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push(Field::Name);
        }
        if self.email.is_some() {
            fields.push(Field::Email);
        }
        if self.company.is_some() {
            fields.push(Field::Company);
        }
        if self.phone.is_some() {
            fields.push(Field::Phone);
        }
        if self.project_type.is_some() {
            fields.push(Field::ProjectType);
        }
        if self.budget.is_some() {
            fields.push(Field::Budget);
        }
        if self.timeline.is_some() {
            fields.push(Field::Timeline);
        }
        if self.description.is_some() {
            fields.push(Field::Description);
        }
        if self.technologies.is_some() {
            fields.push(Field::Technologies);
        }
        if self.features.is_some() {
            fields.push(Field::Features);
        }
        if self.additional_info.is_some() {
            fields.push(Field::AdditionalInfo);
        }
        if self.files.is_some() {
            fields.push(Field::Files);
        }
        if self.preferred_contact.is_some() {
            fields.push(Field::PreferredContact);
        }
        if self.urgency.is_some() {
            fields.push(Field::Urgency);
        }
        if self.hear_about.is_some() {
            fields.push(Field::HearAbout);
        }
        if self.captcha_token.is_some() {
            fields.push(Field::CaptchaToken);
        }
        fields
    }

    /// Merge this update into `fields`, last write wins.
    pub fn apply_to(self, fields: &mut FormFields) {
        if let Some(value) = self.name {
            fields.name = value;
        }
        if let Some(value) = self.email {
            fields.email = value;
        }
        if let Some(value) = self.company {
            fields.company = value;
        }
        if let Some(value) = self.phone {
            fields.phone = value;
        }
        if let Some(value) = self.project_type {
            fields.project_type = value;
        }
        if let Some(value) = self.budget {
            fields.budget = value;
        }
        if let Some(value) = self.timeline {
            fields.timeline = value;
        }
        if let Some(value) = self.description {
            fields.description = value;
        }
        if let Some(value) = self.technologies {
            fields.technologies = value;
        }
        if let Some(value) = self.features {
            fields.features = value;
        }
        if let Some(value) = self.additional_info {
            fields.additional_info = value;
        }
        if let Some(value) = self.files {
            fields.files = value;
        }
        if let Some(value) = self.preferred_contact {
            fields.preferred_contact = value;
        }
        if let Some(value) = self.urgency {
            fields.urgency = value;
        }
        if let Some(value) = self.hear_about {
            fields.hear_about = value;
        }
        if let Some(value) = self.captcha_token {
            fields.captcha_token = value;
        }
    }
}

/// Submission lifecycle for one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Succeeded(_) | SubmissionStatus::Failed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_track_is_linear_and_clamped() {
        assert_eq!(Step::Basics.next(), Step::Project);
        assert_eq!(Step::Review.next(), Step::Review);
        assert_eq!(Step::Basics.prev(), Step::Basics);
        assert_eq!(Step::Review.prev(), Step::Requirements);
        assert_eq!(Step::from_number(3), Some(Step::Requirements));
        assert_eq!(Step::from_number(5), None);
    }

    #[test]
    fn attachment_rejects_disallowed_type() {
        let err = Attachment::new("virus.exe", "application/x-msdownload", vec![0u8; 4]);
        assert!(err.is_err());
    }

    #[test]
    fn attachment_records_byte_size() {
        let file = Attachment::new("brief.pdf", "application/pdf", vec![0u8; 128]).unwrap();
        assert_eq!(file.byte_size, 128);
        assert_eq!(file.bytes().len(), 128);
        assert!(!file.exceeds_size_cap());
    }

    #[test]
    fn update_reports_touched_fields() {
        let update = FormUpdate {
            email: Some("jane@example.com".to_string()),
            technologies: Some(vec!["Rust".to_string()]),
            ..Default::default()
        };
        assert_eq!(update.touched(), vec![Field::Email, Field::Technologies]);
    }

    #[test]
    fn update_merge_is_last_write_wins() {
        let mut fields = FormFields::default();
        FormUpdate {
            name: Some("Jane".to_string()),
            ..Default::default()
        }
        .apply_to(&mut fields);
        FormUpdate {
            name: Some("Janet".to_string()),
            ..Default::default()
        }
        .apply_to(&mut fields);
        assert_eq!(fields.name, "Janet");
        assert_eq!(fields.email, "");
    }
}
