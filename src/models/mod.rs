pub mod payment;
pub mod summary;

pub use payment::{ExternalPayload, PaymentRecord, PaymentRequest, Upstream, ValidationError};
pub use summary::{PaymentsSummary, UpstreamSummary};
