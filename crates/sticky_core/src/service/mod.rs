//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and store calls into UI-facing APIs.
//! - Keep UI layers decoupled from storage details.

pub mod notebook;
