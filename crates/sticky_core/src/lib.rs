//! Data and persistence layer for a desktop sticky-notes application.
//! Owns the note/tag model, the settings snapshot, the delete confirmation
//! flow and the `notes.json` store.

pub mod confirm;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repo;
pub mod service;
pub mod settings;

pub use confirm::{
    confirm_delete, ConfirmDialog, DialogOutcome, DialogPresenter, DialogResponse,
    ResponseAppearance,
};
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteRecord, NoteValidationError, NOTE_FORMAT_VERSION};
pub use model::style::{Style, StyleError};
pub use model::tag::{detect_tags, Tag, TagRangeError};
pub use observe::{Listeners, SubscriptionId};
pub use repo::note_store::{
    default_notes_path, NoteStore, StorageError, StorageResult, APP_ID, NOTES_FILE_NAME,
};
pub use service::notebook::{NoteField, Notebook, NotebookError};
pub use settings::{
    MemorySettingsStore, Settings, SettingsAccessor, SettingsError, SettingsStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
