//! Legal Intake - conversational intake for generated legal documents.
//!
//! A chat with the end user is turned into a structured business profile,
//! one turn at a time, by an extraction oracle. Once the oracle declares the
//! profile complete, a synthesis call renders it into a privacy policy, terms
//! of service or cookie policy.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
