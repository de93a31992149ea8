//! Note aggregate and its on-disk record shape.
//!
//! # Responsibility
//! - Own one note's fields and its tag collection.
//! - Convert between the in-memory [`Note`] and the serializable [`NoteRecord`].
//!
//! # Invariants
//! - `version` is always [`NOTE_FORMAT_VERSION`]; other values are rejected.
//! - `id` is non-empty and never changes after construction.
//! - `modified` is kept as whole seconds since the Unix epoch; sub-second
//!   precision is truncated on every write path.

use crate::model::style::Style;
use crate::model::tag::Tag;
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Only supported note format version.
pub const NOTE_FORMAT_VERSION: u32 = 1;

/// Globally unique note identifier, stored as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random (v4 UUID) identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Plain serializable note shape, as written to `notes.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Serialized as `v` to match the file format.
    #[serde(rename = "v")]
    pub version: u32,
    /// Serialized as `uuid` to match the file format.
    #[serde(rename = "uuid")]
    pub id: NoteId,
    pub content: String,
    pub style: Style,
    pub tags: Vec<Tag>,
    /// RFC 3339 date-time.
    pub modified: DateTime<Utc>,
    pub width: i32,
    pub height: i32,
}

/// One sticky note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NoteRecord", try_from = "NoteRecord")]
pub struct Note {
    version: u32,
    id: NoteId,
    content: String,
    style: Style,
    tags: Vec<Tag>,
    modified: i64,
    width: i32,
    height: i32,
}

impl Note {
    /// Builds a note from a full record.
    ///
    /// # Errors
    /// - [`NoteValidationError::UnsupportedVersion`] when `record.version != 1`.
    /// - [`NoteValidationError::EmptyId`] when the id is blank.
    pub fn from_record(record: NoteRecord) -> Result<Self, NoteValidationError> {
        let mut note = Self {
            version: record.version,
            id: record.id,
            content: record.content,
            style: record.style,
            tags: Vec::new(),
            modified: record.modified.timestamp(),
            width: record.width,
            height: record.height,
        };
        note.replace_tags(record.tags);
        note.validate()?;
        Ok(note)
    }

    /// Checks the invariants every persisted note must hold.
    ///
    /// Tag ranges are checked by [`Tag::new`], so only note-level fields are
    /// inspected here.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.version != NOTE_FORMAT_VERSION {
            return Err(NoteValidationError::UnsupportedVersion(self.version));
        }
        if self.id.as_str().trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        Ok(())
    }

    /// Creates a blank note with a random id and defaults from `settings`.
    pub fn generate(settings: &Settings) -> Self {
        Self {
            version: NOTE_FORMAT_VERSION,
            id: NoteId::random(),
            content: String::new(),
            style: settings.default_style,
            tags: Vec::new(),
            modified: Utc::now().timestamp(),
            width: settings.default_width,
            height: settings.default_height,
        }
    }

    /// Returns a structurally equal note with its own tag collection.
    ///
    /// The id is kept. Callers that insert the copy next to its source must
    /// assign a fresh id with [`Note::with_id`].
    pub fn copy(&self) -> Self {
        Self {
            version: self.version,
            id: self.id.clone(),
            content: self.content.clone(),
            style: self.style,
            tags: self.list_tags(),
            modified: self.modified,
            width: self.width,
            height: self.height,
        }
    }

    /// Consumes the note and returns it under a different id.
    ///
    /// # Errors
    /// - [`NoteValidationError::EmptyId`] when `id` is blank.
    pub fn with_id(mut self, id: NoteId) -> Result<Self, NoteValidationError> {
        if id.as_str().trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        self.id = id;
        Ok(self)
    }

    /// Exports the note as its serializable record.
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            version: self.version,
            id: self.id.clone(),
            content: self.content.clone(),
            style: self.style,
            tags: self.list_tags(),
            modified: self.modified_at(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Returns a snapshot of the tag collection in display order.
    ///
    /// Allocates a new vector on every call.
    pub fn list_tags(&self) -> Vec<Tag> {
        self.tags.to_vec()
    }

    /// Borrowing view of the tags, for callers that do not need ownership.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Clears the tag collection and rebuilds it from `tags`.
    pub fn replace_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags.clear();
        self.tags.extend(tags);
    }

    /// Modification time in whole seconds since the Unix epoch.
    pub fn modified_secs(&self) -> i64 {
        self.modified
    }

    /// Modification time as a timestamp; the sub-second part is always zero.
    pub fn modified_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.modified, 0).unwrap_or_default()
    }

    /// Sets the modification time, truncating to whole seconds.
    pub fn set_modified_at(&mut self, modified: DateTime<Utc>) {
        self.modified = modified.timestamp();
    }

    /// Sets the modification time to now.
    pub fn touch(&mut self) {
        self.set_modified_at(Utc::now());
    }
}

impl From<Note> for NoteRecord {
    fn from(value: Note) -> Self {
        value.to_record()
    }
}

impl TryFrom<NoteRecord> for Note {
    type Error = NoteValidationError;

    fn try_from(value: NoteRecord) -> Result<Self, Self::Error> {
        Note::from_record(value)
    }
}

/// Note record validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    UnsupportedVersion(u32),
    EmptyId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => write!(
                f,
                "unsupported note format version {version}; expected {NOTE_FORMAT_VERSION}"
            ),
            Self::EmptyId => write!(f, "note id must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}
