//! HTTP adapters - REST API implementations.

pub mod intake;

pub use intake::{intake_router, intake_routes, IntakeAppState};
