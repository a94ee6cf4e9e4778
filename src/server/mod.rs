// Server Module - the stateless submission boundary and its collaborators

pub mod boundary;
pub mod rate_limit;

pub use boundary::{BoundaryAddresses, BoundaryResponse, SubmissionBoundary};
pub use rate_limit::{GovernorRateLimit, RateLimit, RateLimitDecision, RateLimitError};
