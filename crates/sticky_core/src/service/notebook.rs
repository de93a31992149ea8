//! In-memory note collection service.
//!
//! # Responsibility
//! - Hold the loaded note collection and apply UI edits to it.
//! - Notify per-field listeners after each edit.
//! - Gate deletion through the confirmation prompt.
//!
//! # Invariants
//! - `create`, `insert` and `duplicate` never add an id that is already
//!   present. A loaded file may still repeat ids; `open` logs them.
//! - Every applied edit touches the note's modification time.
//! - Content edits never change tags; detection runs only through `retag`.
//! - Listeners run after the collection borrow is released, so they may read
//!   the notebook.

use crate::confirm::{confirm_delete, DialogPresenter};
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::model::style::Style;
use crate::model::tag::{detect_tags, Tag};
use crate::observe::{Listeners, SubscriptionId};
use crate::repo::note_store::{NoteStore, StorageError};
use crate::settings::Settings;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Observable note field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteField {
    Content,
    Style,
    Size,
    Tags,
}

impl NoteField {
    pub const ALL: [NoteField; 4] = [
        NoteField::Content,
        NoteField::Style,
        NoteField::Size,
        NoteField::Tags,
    ];
}

/// Service error for notebook use-cases.
#[derive(Debug)]
pub enum NotebookError {
    NoteNotFound(NoteId),
    DuplicateId(NoteId),
    Invalid(NoteValidationError),
    Storage(StorageError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note id already present: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NotebookError {
    fn from(value: NoteValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<StorageError> for NotebookError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

#[derive(Default)]
struct FieldListeners {
    content: Listeners<NoteId>,
    style: Listeners<NoteId>,
    size: Listeners<NoteId>,
    tags: Listeners<NoteId>,
    removed: Listeners<NoteId>,
}

impl FieldListeners {
    fn for_field(&self, field: NoteField) -> &Listeners<NoteId> {
        match field {
            NoteField::Content => &self.content,
            NoteField::Style => &self.style,
            NoteField::Size => &self.size,
            NoteField::Tags => &self.tags,
        }
    }
}

/// Shared handle over the loaded note collection.
///
/// Clones refer to the same collection, which lets deferred callbacks (such
/// as the delete confirmation) act on it.
#[derive(Clone)]
pub struct Notebook {
    store: Rc<NoteStore>,
    notes: Rc<RefCell<Vec<Note>>>,
    listeners: Rc<FieldListeners>,
}

impl Notebook {
    /// Loads the collection from `store`. Never fails; see [`NoteStore::load`].
    ///
    /// A file whose notes share ids is kept as loaded and logged at warn level.
    pub fn open(store: NoteStore) -> Self {
        let notes = store.load();
        let notebook = Self::with_notes(store, notes);
        for id in notebook.duplicate_ids() {
            warn!(
                "event=notes_load module=notebook status=duplicate_id id={id} path={}",
                notebook.store.path().display()
            );
        }
        notebook
    }

    /// Wraps an already loaded collection.
    pub fn with_notes(store: NoteStore, notes: Vec<Note>) -> Self {
        Self {
            store: Rc::new(store),
            notes: Rc::new(RefCell::new(notes)),
            listeners: Rc::new(FieldListeners::default()),
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.notes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.borrow().is_empty()
    }

    /// Returns a snapshot of every note in collection order.
    pub fn notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.notes
            .borrow()
            .iter()
            .map(|note| note.id().clone())
            .collect()
    }

    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.notes
            .borrow()
            .iter()
            .find(|note| note.id() == id)
            .cloned()
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.borrow().iter().any(|note| note.id() == id)
    }

    /// Appends a freshly generated note and returns its id.
    pub fn create(&self, settings: &Settings) -> NoteId {
        let note = Note::generate(settings);
        let id = note.id().clone();
        self.notes.borrow_mut().push(note);
        debug!("event=note_create module=notebook status=ok id={id}");
        id
    }

    /// Appends an existing note.
    ///
    /// # Errors
    /// - [`NotebookError::DuplicateId`] when the id is already present.
    pub fn insert(&self, note: Note) -> Result<(), NotebookError> {
        if self.contains(note.id()) {
            return Err(NotebookError::DuplicateId(note.id().clone()));
        }
        self.notes.borrow_mut().push(note);
        Ok(())
    }

    /// Copies a note under a fresh id and places it right after its source.
    pub fn duplicate(&self, id: &NoteId) -> Result<NoteId, NotebookError> {
        let mut notes = self.notes.borrow_mut();
        let index = position(&notes, id)?;
        let copy = notes[index].copy().with_id(NoteId::random())?;
        let copy_id = copy.id().clone();
        notes.insert(index + 1, copy);
        debug!("event=note_duplicate module=notebook status=ok source={id} id={copy_id}");
        Ok(copy_id)
    }

    /// Replaces content. Tags are left as they are; see [`Notebook::retag`].
    pub fn set_content(
        &self,
        id: &NoteId,
        content: impl Into<String>,
    ) -> Result<(), NotebookError> {
        let content = content.into();
        self.edit(id, NoteField::Content, |note| note.set_content(content))
    }

    /// Replaces the note's tags with the spans detected in its content.
    ///
    /// Returns whether the tags changed. `Tags` listeners and the modification
    /// time are only touched on change.
    pub fn retag(&self, id: &NoteId) -> Result<bool, NotebookError> {
        let changed = {
            let mut notes = self.notes.borrow_mut();
            let index = position(&notes, id)?;
            let note = &mut notes[index];
            let detected = detect_tags(note.content());
            let changed = note.tags() != detected.as_slice();
            if changed {
                note.replace_tags(detected);
                note.touch();
            }
            changed
        };

        if changed {
            self.listeners.tags.emit(id);
        }
        Ok(changed)
    }

    pub fn set_style(&self, id: &NoteId, style: Style) -> Result<(), NotebookError> {
        self.edit(id, NoteField::Style, |note| note.set_style(style))
    }

    pub fn resize(&self, id: &NoteId, width: i32, height: i32) -> Result<(), NotebookError> {
        self.edit(id, NoteField::Size, |note| note.resize(width, height))
    }

    pub fn replace_tags(&self, id: &NoteId, tags: Vec<Tag>) -> Result<(), NotebookError> {
        self.edit(id, NoteField::Tags, |note| note.replace_tags(tags))
    }

    /// Removes a note without confirmation.
    pub fn remove(&self, id: &NoteId) -> Option<Note> {
        let removed = {
            let mut notes = self.notes.borrow_mut();
            let index = notes.iter().position(|note| note.id() == id)?;
            notes.remove(index)
        };
        info!("event=note_delete module=notebook status=ok id={id}");
        self.listeners.removed.emit(id);
        Some(removed)
    }

    /// Removes a note once the user confirms, or immediately when
    /// `settings.confirm_delete` is off.
    ///
    /// Removal is reported through [`Notebook::connect_removed`]; callers save
    /// from there.
    pub fn request_delete<P>(
        &self,
        id: &NoteId,
        settings: &Settings,
        presenter: &mut P,
    ) -> Result<(), NotebookError>
    where
        P: DialogPresenter + ?Sized,
    {
        if !self.contains(id) {
            return Err(NotebookError::NoteNotFound(id.clone()));
        }

        let notebook = self.clone();
        let target = id.clone();
        confirm_delete(settings, presenter, move || {
            notebook.remove(&target);
        });
        Ok(())
    }

    /// Writes the whole collection through the store.
    pub fn save(&self) -> Result<(), NotebookError> {
        let notes = self.notes.borrow();
        self.store.save(&notes)?;
        Ok(())
    }

    /// Reports whether two notes share an id.
    pub fn has_duplicate_ids(&self) -> bool {
        !self.duplicate_ids().is_empty()
    }

    /// Ids held by more than one note, each listed once in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<NoteId> {
        let notes = self.notes.borrow();
        let mut seen = HashSet::with_capacity(notes.len());
        let mut repeated: Vec<NoteId> = Vec::new();
        for note in notes.iter() {
            if !seen.insert(note.id()) && !repeated.contains(note.id()) {
                repeated.push(note.id().clone());
            }
        }
        repeated
    }

    /// Registers a listener for edits to one field of any note.
    pub fn connect_changed(
        &self,
        field: NoteField,
        listener: impl Fn(&NoteId) + 'static,
    ) -> SubscriptionId {
        self.listeners.for_field(field).connect(listener)
    }

    pub fn disconnect_changed(&self, field: NoteField, id: SubscriptionId) -> bool {
        self.listeners.for_field(field).disconnect(id)
    }

    pub fn connect_removed(&self, listener: impl Fn(&NoteId) + 'static) -> SubscriptionId {
        self.listeners.removed.connect(listener)
    }

    fn edit(
        &self,
        id: &NoteId,
        field: NoteField,
        apply: impl FnOnce(&mut Note),
    ) -> Result<(), NotebookError> {
        {
            let mut notes = self.notes.borrow_mut();
            let index = position(&notes, id)?;
            let note = &mut notes[index];
            apply(&mut *note);
            note.touch();
        }
        self.listeners.for_field(field).emit(id);
        Ok(())
    }
}

fn position(notes: &[Note], id: &NoteId) -> Result<usize, NotebookError> {
    notes
        .iter()
        .position(|note| note.id() == id)
        .ok_or_else(|| NotebookError::NoteNotFound(id.clone()))
}
