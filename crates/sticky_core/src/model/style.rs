//! Note color style model.
//!
//! # Invariants
//! - Exactly eight styles exist.
//! - On-disk representation is the integer 1..=8 in declaration order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Background style applied to one note window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Style {
    #[default]
    Yellow = 1,
    Pink = 2,
    Green = 3,
    Purple = 4,
    Blue = 5,
    Gray = 6,
    Charcoal = 7,
    Window = 8,
}

impl Style {
    /// All styles in on-disk order.
    pub const ALL: [Style; 8] = [
        Style::Yellow,
        Style::Pink,
        Style::Green,
        Style::Purple,
        Style::Blue,
        Style::Gray,
        Style::Charcoal,
        Style::Window,
    ];

    /// Stable lowercase name, also used by the settings schema.
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Gray => "gray",
            Self::Charcoal => "charcoal",
            Self::Window => "window",
        }
    }

    /// Parses a lowercase style name.
    pub fn from_name(value: &str) -> Result<Self, StyleError> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.name() == normalized)
            .ok_or_else(|| StyleError::UnknownName(value.to_string()))
    }

    /// Integer code used on disk.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Style> for u8 {
    fn from(value: Style) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Style {
    type Error = StyleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|style| style.code() == value)
            .ok_or(StyleError::OutOfRange(i64::from(value)))
    }
}

impl TryFrom<i32> for Style {
    type Error = StyleError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| StyleError::OutOfRange(i64::from(value)))
            .and_then(Style::try_from)
    }
}

/// Style decode errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    OutOfRange(i64),
    UnknownName(String),
}

impl Display for StyleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(f, "style code {value} is outside 1..=8"),
            Self::UnknownName(value) => write!(f, "unknown style name `{value}`"),
        }
    }
}

impl Error for StyleError {}
