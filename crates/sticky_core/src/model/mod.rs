//! Sticky note domain model.
//!
//! # Responsibility
//! - Define the note, tag and style records shared by persistence and UI.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Each note exclusively owns its tag collection.

pub mod note;
pub mod style;
pub mod tag;
