//! Identifiers, time, errors and the lifecycle trait shared by the intake
//! and document aggregates.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DocumentId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
