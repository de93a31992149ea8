//! JSON-file note store.
//!
//! # Responsibility
//! - Resolve the per-user `notes.json` location.
//! - Read the note array defensively and replace it atomically on save.
//!
//! # Invariants
//! - `load` returns an empty collection for a missing file and for any other
//!   document-level failure, after logging it.
//! - Invalid elements are skipped one by one; valid neighbours still load.
//! - `save` refuses notes that `load` would skip.
//! - `save` writes a temp file in the target directory and renames it over the
//!   target, so readers never observe a partial document.
//! - No locking: with several writers the last rename wins.

use crate::model::note::{Note, NoteRecord, NoteValidationError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory name under the user data directory.
pub const APP_ID: &str = "sticky";
/// File holding the serialized note array.
pub const NOTES_FILE_NAME: &str = "notes.json";

pub type StorageResult<T> = Result<T, StorageError>;

/// Note file read/write errors.
#[derive(Debug)]
pub enum StorageError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    Invalid(NoteValidationError),
    NoDataDir,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::Json(err) => write!(f, "invalid notes document: {err}"),
            Self::Invalid(err) => write!(f, "invalid note: {err}"),
            Self::NoDataDir => write!(f, "platform does not expose a user data directory"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::NoDataDir => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<NoteValidationError> for StorageError {
    fn from(value: NoteValidationError) -> Self {
        Self::Invalid(value)
    }
}

fn decode_note(value: serde_json::Value) -> StorageResult<Note> {
    let record: NoteRecord = serde_json::from_value(value)?;
    Ok(Note::from_record(record)?)
}

/// Returns `<user data dir>/sticky/notes.json`.
///
/// # Errors
/// - [`StorageError::NoDataDir`] when the platform has no data directory.
pub fn default_notes_path() -> StorageResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
    Ok(data_dir.join(APP_ID).join(NOTES_FILE_NAME))
}

/// Single-file note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location.
    pub fn open_default() -> StorageResult<Self> {
        default_notes_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all notes in file order.
    ///
    /// Never fails: a missing file yields an empty collection, and every other
    /// failure is logged and also yields an empty collection.
    pub fn load(&self) -> Vec<Note> {
        match self.try_load() {
            Ok(notes) => notes,
            Err(err) => {
                error!(
                    "event=notes_load module=repo status=error path={} error={err}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Loads all notes, reporting failures other than a missing file.
    ///
    /// The document must be a JSON array. Elements that do not decode into a
    /// valid note are skipped and logged; the rest are returned in file order.
    pub fn try_load(&self) -> StorageResult<Vec<Note>> {
        self.ensure_parent_dir();

        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=notes_load module=repo status=ok reason=missing_file path={}",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let values: Vec<serde_json::Value> = serde_json::from_slice(&contents)?;
        let total = values.len();
        let notes: Vec<Note> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match decode_note(value) {
                Ok(note) => Some(note),
                Err(err) => {
                    warn!(
                        "event=notes_load_record module=repo status=skipped index={index} path={} error={err}",
                        self.path.display()
                    );
                    None
                }
            })
            .collect();
        info!(
            "event=notes_load module=repo status=ok count={} skipped={} path={}",
            notes.len(),
            total - notes.len(),
            self.path.display()
        );
        Ok(notes)
    }

    /// Replaces the file with the pretty-printed (2-space) note array.
    ///
    /// # Errors
    /// - [`StorageError::Invalid`] when a note fails [`Note::validate`]; the
    ///   file is left untouched.
    /// - [`StorageError::Json`] when serialization fails.
    /// - [`StorageError::Io`] when the temp file cannot be written or renamed.
    pub fn save(&self, notes: &[Note]) -> StorageResult<()> {
        for note in notes {
            note.validate()?;
        }
        self.ensure_parent_dir();

        let records: Vec<_> = notes.iter().map(Note::to_record).collect();
        let contents = serde_json::to_string_pretty(&records)?;

        let dir = self.parent_dir();
        let mut temp = NamedTempFile::new_in(dir).map_err(|err| Self::io_error_at(dir, err))?;
        temp.write_all(contents.as_bytes())
            .map_err(|err| Self::io_error_at(temp.path(), err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| Self::io_error_at(temp.path(), err))?;
        temp.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;

        info!(
            "event=notes_save module=repo status=ok count={} path={}",
            notes.len(),
            self.path.display()
        );
        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn ensure_parent_dir(&self) {
        let dir = self.parent_dir();
        match fs::create_dir_all(dir) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => {
                error!(
                    "event=notes_dir_create module=repo status=error path={} error={err}",
                    dir.display()
                );
            }
        }
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        Self::io_error_at(&self.path, source)
    }

    fn io_error_at(path: &Path, source: io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{default_notes_path, NoteStore, APP_ID, NOTES_FILE_NAME};

    #[test]
    fn default_path_ends_with_app_and_file_name() {
        if let Ok(path) = default_notes_path() {
            assert!(path.ends_with(format!("{APP_ID}/{NOTES_FILE_NAME}")));
        }
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        let store = NoteStore::new(NOTES_FILE_NAME);
        assert_eq!(store.parent_dir(), std::path::Path::new("."));
    }
}
