// Form Module - Multi-Step Inquiry Form Controller
//
// This module implements the complete four-step form lifecycle: typed field
// storage, per-step validation, the step state machine, and the async session
// that drives submission.

pub mod machine;
pub mod session;
pub mod types;
pub mod validator;

pub use machine::{FormMachine, SubmitGate};
pub use session::{FormSession, DEFAULT_RESET_DELAY};
pub use types::{
    Attachment, AttachmentError, Field, FormFields, FormUpdate, Step, SubmissionStatus,
};
pub use validator::{validate_step, ValidationErrors};
