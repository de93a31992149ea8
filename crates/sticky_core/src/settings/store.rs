//! Key-value settings store seam and in-process implementation.

use crate::observe::{Listeners, SubscriptionId};
use crate::settings::{
    Settings, KEY_CONFIRM_DELETE, KEY_DEFAULT_HEIGHT, KEY_DEFAULT_STYLE, KEY_DEFAULT_WIDTH,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// Typed key-value store the settings snapshot is read from.
///
/// Change notifications do not carry the changed key.
pub trait SettingsStore {
    /// Reads an enum-typed key as its integer value.
    fn get_enum(&self, key: &str) -> Option<i32>;
    fn get_int(&self, key: &str) -> Option<i32>;
    fn get_boolean(&self, key: &str) -> Option<bool>;
    /// Registers a listener fired after any key changes.
    fn connect_changed(&self, listener: Box<dyn Fn()>) -> SubscriptionId;
    fn disconnect(&self, id: SubscriptionId) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingValue {
    Enum(i32),
    Int(i32),
    Boolean(bool),
}

/// In-process settings store seeded with schema defaults.
pub struct MemorySettingsStore {
    values: RefCell<HashMap<String, SettingValue>>,
    changed: Listeners<()>,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::with_settings(&Settings::default())
    }
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose four watched keys hold the given snapshot.
    pub fn with_settings(settings: &Settings) -> Self {
        let values = HashMap::from([
            (
                KEY_DEFAULT_STYLE.to_string(),
                SettingValue::Enum(i32::from(settings.default_style.code())),
            ),
            (
                KEY_DEFAULT_WIDTH.to_string(),
                SettingValue::Int(settings.default_width),
            ),
            (
                KEY_DEFAULT_HEIGHT.to_string(),
                SettingValue::Int(settings.default_height),
            ),
            (
                KEY_CONFIRM_DELETE.to_string(),
                SettingValue::Boolean(settings.confirm_delete),
            ),
        ]);
        Self {
            values: RefCell::new(values),
            changed: Listeners::new(),
        }
    }

    pub fn set_enum(&self, key: &str, value: i32) {
        self.write(key, Some(SettingValue::Enum(value)));
    }

    pub fn set_int(&self, key: &str, value: i32) {
        self.write(key, Some(SettingValue::Int(value)));
    }

    pub fn set_boolean(&self, key: &str, value: bool) {
        self.write(key, Some(SettingValue::Boolean(value)));
    }

    /// Removes a key. Readers see it as missing.
    pub fn reset(&self, key: &str) {
        self.write(key, None);
    }

    fn write(&self, key: &str, value: Option<SettingValue>) {
        {
            let mut values = self.values.borrow_mut();
            match value {
                Some(value) => {
                    values.insert(key.to_string(), value);
                }
                None => {
                    values.remove(key);
                }
            }
        }
        self.changed.emit(&());
    }

    fn read(&self, key: &str) -> Option<SettingValue> {
        self.values.borrow().get(key).copied()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_enum(&self, key: &str) -> Option<i32> {
        match self.read(key)? {
            SettingValue::Enum(value) => Some(value),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        match self.read(key)? {
            SettingValue::Int(value) => Some(value),
            _ => None,
        }
    }

    fn get_boolean(&self, key: &str) -> Option<bool> {
        match self.read(key)? {
            SettingValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn connect_changed(&self, listener: Box<dyn Fn()>) -> SubscriptionId {
        self.changed.connect(move |_| listener())
    }

    fn disconnect(&self, id: SubscriptionId) -> bool {
        self.changed.disconnect(id)
    }
}
