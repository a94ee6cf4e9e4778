// Submission Module - transport payload and the adapter boundary
//
// Translates in-memory form state into a flat multipart-style payload and
// normalizes whatever the transport returns into `{ success, message }`.

pub mod adapter;
pub mod payload;

pub use adapter::{
    LocalTransport, SubmissionAdapter, SubmissionTransport, SubmitOutcome, TransportError,
    MSG_GENERIC_RETRY,
};
pub use payload::SubmissionPayload;
