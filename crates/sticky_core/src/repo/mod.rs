//! Note persistence.
//!
//! # Responsibility
//! - Load and save the whole note collection as one JSON document.
//! - Keep filesystem and serialization details out of the service layer.
//!
//! # Invariants
//! - The full collection is the unit of durability; there is no per-note write.
//! - Loading never fails its caller; saving reports every failure.

pub mod note_store;
