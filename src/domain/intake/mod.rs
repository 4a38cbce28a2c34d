//! Intake module - the conversation that builds a business profile.
//!
//! A session starts with a greeting, accumulates user/assistant turns and an
//! open-ended field map, and closes once the extraction oracle declares the
//! profile complete.

mod document_type;
mod fields;
pub mod prompts;
mod reply;
mod session;
mod turn;

pub use document_type::{DocumentType, RequiredField};
pub use fields::StructuredFields;
pub use reply::{OracleReply, ReplySource};
pub use session::{IntakePhase, IntakeSession, SessionPatch};
pub use turn::{Turn, TurnRole};
