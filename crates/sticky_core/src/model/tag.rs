//! Tag model: named character ranges over note content.
//!
//! # Invariants
//! - Offsets are char (Unicode scalar) offsets, `start` inclusive, `end` exclusive.
//! - `start <= end`; reversed ranges are rejected, including on decode.
//! - Ranges past the end of the content are tolerated and resolve to no span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tag name for detected URLs.
pub const TAG_LINK: &str = "link";
/// Tag name for detected `@handle` mentions.
pub const TAG_MENTION: &str = "mention";
/// Tag name for detected `#word` hashtags.
pub const TAG_HASHTAG: &str = "hashtag";

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>]+").expect("valid link regex"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\B@\w+").expect("valid mention regex"));
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\B#\w+").expect("valid hashtag regex"));

const LINK_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Named sub-range of a note's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TagRecord")]
pub struct Tag {
    name: String,
    start: u32,
    end: u32,
}

#[derive(Deserialize)]
struct TagRecord {
    name: String,
    start: u32,
    end: u32,
}

impl TryFrom<TagRecord> for Tag {
    type Error = TagRangeError;

    fn try_from(value: TagRecord) -> Result<Self, Self::Error> {
        Tag::new(value.name, value.start, value.end)
    }
}

impl Tag {
    /// Creates a tag over `start..end`.
    ///
    /// # Errors
    /// - Returns [`TagRangeError::Reversed`] when `start > end`.
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Result<Self, TagRangeError> {
        if start > end {
            return Err(TagRangeError::Reversed { start, end });
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
        })
    }

    /// Creates a tag whose position is not known yet (`0..0`).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: 0,
            end: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inclusive start offset, in chars.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Exclusive end offset, in chars.
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tagged text, or `None` when the range does not fit `content`.
    pub fn span_in<'a>(&self, content: &'a str) -> Option<&'a str> {
        if self.start > self.end {
            return None;
        }
        let start = char_to_byte(content, self.start)?;
        let end = char_to_byte(content, self.end)?;
        content.get(start..end)
    }
}

fn char_to_byte(content: &str, offset: u32) -> Option<usize> {
    let offset = usize::try_from(offset).ok()?;
    if offset == 0 {
        return Some(0);
    }
    content
        .char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(content.len()))
        .nth(offset)
}

fn byte_to_char(content: &str, byte: usize) -> u32 {
    u32::try_from(content[..byte].chars().count()).unwrap_or(u32::MAX)
}

/// Scans content for taggable spans (links, mentions, hashtags).
///
/// Results are sorted by start offset. Spans overlapping an earlier span are
/// dropped, so a `#fragment` inside a URL stays part of the link.
pub fn detect_tags(content: &str) -> Vec<Tag> {
    let mut spans: Vec<(usize, usize, &'static str)> = Vec::new();

    for found in LINK_RE.find_iter(content) {
        let trimmed = found.as_str().trim_end_matches(LINK_TRAILING_PUNCTUATION);
        if !trimmed.is_empty() {
            spans.push((found.start(), found.start() + trimmed.len(), TAG_LINK));
        }
    }
    for found in MENTION_RE.find_iter(content) {
        spans.push((found.start(), found.end(), TAG_MENTION));
    }
    for found in HASHTAG_RE.find_iter(content) {
        spans.push((found.start(), found.end(), TAG_HASHTAG));
    }

    spans.sort_by_key(|(start, end, _)| (*start, std::cmp::Reverse(*end)));

    let mut tags = Vec::with_capacity(spans.len());
    let mut covered_until = 0_usize;
    for (start, end, name) in spans {
        if start < covered_until {
            continue;
        }
        covered_until = end;
        tags.push(Tag {
            name: name.to_string(),
            start: byte_to_char(content, start),
            end: byte_to_char(content, end),
        });
    }
    tags
}

/// Tag range validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRangeError {
    Reversed { start: u32, end: u32 },
}

impl Display for TagRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reversed { start, end } => {
                write!(f, "tag end ({end}) must be >= tag start ({start})")
            }
        }
    }
}

impl Error for TagRangeError {}
