//! Document module - generated legal documents and their status lifecycle.

mod aggregate;
mod status;

pub use aggregate::Document;
pub use status::DocumentStatus;
