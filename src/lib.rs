// Lead Intake Library - Consultation Funnel Form Controller
// This exposes the core components for testing and integration

pub mod config;
pub mod experiment;
pub mod form;
pub mod notify;
pub mod registry;
pub mod server;
pub mod submit;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, LeadIntakeConfig};
pub use experiment::{
    Experiment, ExperimentAssigner, ExperimentMetrics, InMemoryVariantStore, Variant, VariantStore,
};
pub use form::{
    validate_step, Attachment, Field, FormFields, FormMachine, FormSession, FormUpdate, Step,
    SubmissionStatus, SubmitGate, ValidationErrors,
};
pub use notify::{DeliveryId, EmailMessage, HttpNotificationService, NotificationService, NotifyError};
pub use server::{
    BoundaryAddresses, BoundaryResponse, GovernorRateLimit, RateLimit, RateLimitDecision,
    SubmissionBoundary,
};
pub use submit::{
    LocalTransport, SubmissionAdapter, SubmissionPayload, SubmissionTransport, SubmitOutcome,
    TransportError,
};
pub use telemetry::{generate_correlation_id, init_telemetry};
