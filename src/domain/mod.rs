//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `intake` - Intake sessions, turns, structured fields, prompts and reply parsing
//! - `document` - Generated documents and their status lifecycle

pub mod document;
pub mod foundation;
pub mod intake;
