//! User-configurable defaults and behavior flags.
//!
//! # Responsibility
//! - Read the four watched keys into an immutable [`Settings`] snapshot.
//! - Keep an owned snapshot current through [`SettingsAccessor`].
//!
//! # Invariants
//! - A snapshot is always rebuilt in full, never patched per key.
//! - A failed refresh keeps the previous snapshot.

use crate::model::style::{Style, StyleError};
use crate::observe::SubscriptionId;
use log::{debug, error};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

mod store;

pub use store::{MemorySettingsStore, SettingsStore};

pub const KEY_DEFAULT_STYLE: &str = "default-style";
pub const KEY_DEFAULT_WIDTH: &str = "default-width";
pub const KEY_DEFAULT_HEIGHT: &str = "default-height";
pub const KEY_CONFIRM_DELETE: &str = "confirm-delete";

pub const DEFAULT_NOTE_WIDTH: i32 = 300;
pub const DEFAULT_NOTE_HEIGHT: i32 = 300;

/// Snapshot of the watched settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub default_style: Style,
    pub default_width: i32,
    pub default_height: i32,
    pub confirm_delete: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_style: Style::Yellow,
            default_width: DEFAULT_NOTE_WIDTH,
            default_height: DEFAULT_NOTE_HEIGHT,
            confirm_delete: true,
        }
    }
}

impl Settings {
    /// Reads all four keys from `store`.
    ///
    /// # Errors
    /// - [`SettingsError::MissingKey`] when a key is absent or has another type.
    /// - [`SettingsError::InvalidStyle`] when `default-style` is not 1..=8.
    pub fn read_from<S: SettingsStore + ?Sized>(store: &S) -> Result<Self, SettingsError> {
        let style_code = store
            .get_enum(KEY_DEFAULT_STYLE)
            .ok_or(SettingsError::MissingKey(KEY_DEFAULT_STYLE))?;
        let default_style = Style::try_from(style_code).map_err(SettingsError::InvalidStyle)?;

        Ok(Self {
            default_style,
            default_width: store
                .get_int(KEY_DEFAULT_WIDTH)
                .ok_or(SettingsError::MissingKey(KEY_DEFAULT_WIDTH))?,
            default_height: store
                .get_int(KEY_DEFAULT_HEIGHT)
                .ok_or(SettingsError::MissingKey(KEY_DEFAULT_HEIGHT))?,
            confirm_delete: store
                .get_boolean(KEY_CONFIRM_DELETE)
                .ok_or(SettingsError::MissingKey(KEY_CONFIRM_DELETE))?,
        })
    }
}

/// Settings read errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    MissingKey(&'static str),
    InvalidStyle(StyleError),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey(key) => write!(f, "settings key `{key}` is missing or mistyped"),
            Self::InvalidStyle(err) => write!(f, "invalid `{KEY_DEFAULT_STYLE}`: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidStyle(err) => Some(err),
            Self::MissingKey(_) => None,
        }
    }
}

/// Owns the current [`Settings`] snapshot and keeps it in sync with a store.
///
/// The change listener is registered once in [`SettingsAccessor::bind`] and
/// removed on drop.
pub struct SettingsAccessor<S: SettingsStore + ?Sized + 'static> {
    store: Rc<S>,
    snapshot: Rc<Cell<Settings>>,
    subscription: SubscriptionId,
}

impl<S: SettingsStore + ?Sized + 'static> SettingsAccessor<S> {
    /// Reads the initial snapshot and subscribes to store changes.
    ///
    /// # Errors
    /// - Returns the read error when the store does not hold a valid schema.
    ///   Callers treat this as a startup failure.
    pub fn bind(store: Rc<S>) -> Result<Self, SettingsError> {
        let snapshot = Rc::new(Cell::new(Settings::read_from(store.as_ref())?));

        let weak_store: Weak<S> = Rc::downgrade(&store);
        let weak_snapshot = Rc::downgrade(&snapshot);
        let subscription = store.connect_changed(Box::new(move || {
            let (Some(store), Some(snapshot)) = (weak_store.upgrade(), weak_snapshot.upgrade())
            else {
                return;
            };
            refresh(store.as_ref(), &snapshot);
        }));

        Ok(Self {
            store,
            snapshot,
            subscription,
        })
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Settings {
        self.snapshot.get()
    }

    /// Re-reads the store outside of a change notification.
    pub fn reload(&self) {
        refresh(self.store.as_ref(), &self.snapshot);
    }

    pub fn store(&self) -> &Rc<S> {
        &self.store
    }
}

impl<S: SettingsStore + ?Sized + 'static> Drop for SettingsAccessor<S> {
    fn drop(&mut self) {
        self.store.disconnect(self.subscription);
    }
}

fn refresh<S: SettingsStore + ?Sized>(store: &S, snapshot: &Cell<Settings>) {
    match Settings::read_from(store) {
        Ok(settings) => {
            snapshot.set(settings);
            debug!(
                "event=settings_refresh module=settings status=ok style={} width={} height={} confirm_delete={}",
                settings.default_style,
                settings.default_width,
                settings.default_height,
                settings.confirm_delete
            );
        }
        Err(err) => {
            error!(
                "event=settings_refresh module=settings status=error keep_previous=true error={err}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        MemorySettingsStore, Settings, SettingsAccessor, SettingsError, KEY_CONFIRM_DELETE,
        KEY_DEFAULT_HEIGHT, KEY_DEFAULT_STYLE, KEY_DEFAULT_WIDTH,
    };
    use crate::model::style::Style;
    use crate::settings::SettingsStore;
    use std::rc::Rc;

    #[test]
    fn default_store_matches_default_snapshot() {
        let store = MemorySettingsStore::new();
        assert_eq!(Settings::read_from(&store).unwrap(), Settings::default());
    }

    #[test]
    fn bind_fails_on_missing_key() {
        let store = Rc::new(MemorySettingsStore::new());
        store.reset(KEY_DEFAULT_HEIGHT);
        let err = SettingsAccessor::bind(store).err().unwrap();
        assert_eq!(err, SettingsError::MissingKey(KEY_DEFAULT_HEIGHT));
    }

    #[test]
    fn change_to_one_key_updates_only_that_field() {
        let store = Rc::new(MemorySettingsStore::new());
        let accessor = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
        let before = accessor.current();

        store.set_enum(KEY_DEFAULT_STYLE, i32::from(Style::Charcoal.code()));
        let after = accessor.current();
        assert_eq!(after.default_style, Style::Charcoal);
        assert_eq!(after.default_width, before.default_width);
        assert_eq!(after.default_height, before.default_height);
        assert_eq!(after.confirm_delete, before.confirm_delete);

        store.set_boolean(KEY_CONFIRM_DELETE, false);
        assert!(!accessor.current().confirm_delete);
        assert_eq!(accessor.current().default_style, Style::Charcoal);
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let store = Rc::new(MemorySettingsStore::new());
        let accessor = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
        store.set_int(KEY_DEFAULT_WIDTH, 640);
        store.set_enum(KEY_DEFAULT_STYLE, 42);

        let current = accessor.current();
        assert_eq!(current.default_width, 640);
        assert_eq!(current.default_style, Style::Yellow);
    }

    #[test]
    fn drop_disconnects_listener() {
        let store = Rc::new(MemorySettingsStore::new());
        let accessor = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
        drop(accessor);
        store.set_int(KEY_DEFAULT_WIDTH, 1);
        assert_eq!(store.get_int(KEY_DEFAULT_WIDTH), Some(1));
    }

    #[test]
    fn works_through_trait_object() {
        let store: Rc<dyn SettingsStore> = Rc::new(MemorySettingsStore::new());
        let accessor = SettingsAccessor::bind(store).unwrap();
        assert_eq!(accessor.current(), Settings::default());
    }
}
