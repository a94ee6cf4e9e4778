// Field Registry - static option lists for the multi-step inquiry form
// Immutable configuration consumed by the validator, the boundary, and the
// presentation layer. No behavior beyond membership checks.

/// Project categories offered on the consultation form (step 2).
pub const PROJECT_TYPES: &[&str] = &[
    "Web Application",
    "Mobile App",
    "E-commerce Site",
    "Landing Page",
    "API Development",
    "Other",
];

/// Budget brackets offered on the consultation form (step 2).
pub const BUDGET_RANGES: &[&str] = &[
    "Under $1,000",
    "$1,000 - $5,000",
    "$5,000 - $10,000",
    "$10,000 - $25,000",
    "$25,000+",
];

/// Delivery timelines offered on the consultation form (step 2).
pub const TIMELINES: &[&str] = &[
    "ASAP",
    "Within 1 month",
    "1 - 3 months",
    "3 - 6 months",
    "Flexible",
];

/// Technology stack multi-select options (step 3).
pub const TECHNOLOGIES: &[&str] = &[
    "React / Next.js",
    "Vue / Nuxt",
    "Node.js",
    "Rust",
    "Python",
    "PostgreSQL",
    "AWS",
    "No preference",
];

/// Feature multi-select options (step 3).
pub const FEATURES: &[&str] = &[
    "User accounts",
    "Payments",
    "Admin dashboard",
    "Search",
    "File uploads",
    "Email notifications",
    "Analytics",
    "Third-party integrations",
];

/// Preferred contact methods (step 4).
pub const CONTACT_METHODS: &[&str] = &["Email", "Phone", "Video Call"];

/// Urgency levels (step 4).
pub const URGENCY_LEVELS: &[&str] = &["Low", "Medium", "High", "Critical"];

/// "How did you hear about me" sources (step 4).
pub const HEAR_ABOUT_SOURCES: &[&str] = &[
    "Google Search",
    "Social Media",
    "Referral",
    "GitHub",
    "Other",
];

/// File extensions accepted for inquiry attachments.
pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "png", "jpg", "jpeg", "zip"];

/// MIME types accepted for inquiry attachments.
pub const ALLOWED_ATTACHMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/png",
    "image/jpeg",
    "application/zip",
];

/// Stated per-file size cap for attachments (10 MB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Case-insensitive membership check against an option list.
pub fn is_known_option(list: &[&str], value: &str) -> bool {
    list.iter().any(|option| option.eq_ignore_ascii_case(value))
}

/// Whether a staged file passes the attachment allow-list, by extension or
/// declared MIME type.
pub fn is_allowed_attachment(file_name: &str, mime_type: &str) -> bool {
    let extension_allowed = file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_ATTACHMENT_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);

    extension_allowed || ALLOWED_ATTACHMENT_MIME_TYPES.contains(&mime_type)
}
