// Transport payload - flat key/value parts plus positional attachments

use std::collections::BTreeMap;

use crate::form::types::{Attachment, Field, FormFields};

/// The wire shape of one submission: scalar fields as text parts, collection
/// fields serialized as JSON text, and attachments as discrete parts keyed by
/// positional index with a sibling `attachmentCount` scalar.
///
/// Built from [`FormFields`] by value; attachment buffers are shared with the
/// staged copy rather than duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
    parts: BTreeMap<String, String>,
    attachments: Vec<Attachment>,
}

impl SubmissionPayload {
    pub fn from_fields(fields: FormFields) -> Self {
        let mut parts = BTreeMap::new();
        let mut put = |field: Field, value: String| {
            parts.insert(field.wire_name().to_string(), value);
        };

        put(Field::Name, fields.name);
        put(Field::Email, fields.email);
        put(Field::Company, fields.company);
        put(Field::Phone, fields.phone);
        put(Field::ProjectType, fields.project_type);
        put(Field::Budget, fields.budget);
        put(Field::Timeline, fields.timeline);
        put(Field::Description, fields.description);
        put(Field::Technologies, to_json_list(&fields.technologies));
        put(Field::Features, to_json_list(&fields.features));
        put(Field::AdditionalInfo, fields.additional_info);
        put(Field::PreferredContact, fields.preferred_contact);
        put(Field::Urgency, fields.urgency);
        put(Field::HearAbout, fields.hear_about);
        put(Field::CaptchaToken, fields.captcha_token);
        parts.insert(
            "attachmentCount".to_string(),
            fields.files.len().to_string(),
        );

        Self {
            parts,
            attachments: fields.files,
        }
    }

    /// Wire key for the attachment at `index`.
    pub fn attachment_key(index: usize) -> String {
        format!("attachment_{index}")
    }

    pub fn part(&self, key: &str) -> Option<&str> {
        self.parts.get(key).map(String::as_str)
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.part(field.wire_name())
    }

    pub fn parts(&self) -> &BTreeMap<String, String> {
        &self.parts
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::types::FormUpdate;

    fn sample_fields() -> FormFields {
        let mut fields = FormFields::default();
        FormUpdate {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            technologies: Some(vec!["Rust".to_string(), "PostgreSQL".to_string()]),
            files: Some(vec![
                Attachment::new("brief.pdf", "application/pdf", vec![1, 2, 3]).unwrap(),
                Attachment::new("mockup.png", "image/png", vec![4, 5]).unwrap(),
            ]),
            captcha_token: Some("tok123".to_string()),
            ..Default::default()
        }
        .apply_to(&mut fields);
        fields
    }

    #[test]
    fn scalars_pass_through_as_text_parts() {
        let payload = SubmissionPayload::from_fields(sample_fields());
        assert_eq!(payload.field(Field::Name), Some("Jane Doe"));
        assert_eq!(payload.field(Field::Email), Some("jane@example.com"));
        assert_eq!(payload.field(Field::CaptchaToken), Some("tok123"));
        // Empty optionals still appear as empty parts.
        assert_eq!(payload.field(Field::Company), Some(""));
    }

    #[test]
    fn collections_are_serialized_as_json_text() {
        let payload = SubmissionPayload::from_fields(sample_fields());
        assert_eq!(
            payload.field(Field::Technologies),
            Some(r#"["Rust","PostgreSQL"]"#)
        );
        assert_eq!(payload.field(Field::Features), Some("[]"));
    }

    #[test]
    fn attachments_keep_order_and_count() {
        let payload = SubmissionPayload::from_fields(sample_fields());
        assert_eq!(payload.part("attachmentCount"), Some("2"));
        assert_eq!(payload.attachments().len(), 2);
        assert_eq!(payload.attachments()[0].file_name, "brief.pdf");
        assert_eq!(payload.attachments()[1].file_name, "mockup.png");
        assert_eq!(SubmissionPayload::attachment_key(0), "attachment_0");
    }

    #[test]
    fn attachment_buffers_are_shared_not_copied() {
        let fields = sample_fields();
        let staged = fields.files[0].clone();
        let payload = SubmissionPayload::from_fields(fields);
        assert_eq!(payload.attachments()[0], staged);
        assert_eq!(
            payload.attachments()[0].bytes().as_ptr(),
            staged.bytes().as_ptr()
        );
    }
}
