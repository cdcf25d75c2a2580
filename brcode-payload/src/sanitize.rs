/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Free-text note sanitization.
//!
//! Payer apps display the note verbatim, and many of them only cope with a
//! restricted ASCII set. Notes are normalized as follows, in this order:
//!
//! 1. Unicode canonical decomposition (NFD), so `é` becomes `e` + U+0301
//! 2. Combining marks are removed
//! 3. Latin letters without a decomposition (`ø`, `ł`, `ß`, ...) are folded
//!    to their ASCII base letters
//! 4. Anything outside `A-Z a-z 0-9`, space, `-`, `_` and `.` is removed
//! 5. The result is truncated to [`NOTE_MAX_CHARS`] characters
//!
//! Truncation happens last: the cap applies to the sanitized text.

use brcode_core::error::EncodeError;
use brcode_core::field::tags;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Maximum length of a sanitized note, in characters.
pub const NOTE_MAX_CHARS: usize = 50;

/// Sanitized, non-empty note carried in the merchant account template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Note(String);

impl Note {
    /// Sanitizes `text` into a note.
    ///
    /// # Returns
    /// `None` if nothing is left after sanitization.
    #[must_use]
    pub fn new(text: &str) -> Option<Self> {
        let sanitized = sanitize_note(text);
        if sanitized.is_empty() {
            None
        } else {
            Some(Self(sanitized))
        }
    }

    /// Returns the note as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length in bytes, equal to the length in characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: empty notes are represented as `None`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.0
    }
}

// Deserialized notes are sanitized again and must not end up empty.
impl TryFrom<String> for Note {
    type Error = EncodeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(&text).ok_or(EncodeError::EmptyValue {
            tag: tags::account::NOTE,
        })
    }
}

/// Sanitizes free text for use as a payload note.
///
/// # Example
/// ```
/// use brcode_payload::sanitize::sanitize_note;
///
/// assert_eq!(sanitize_note("café üñïçødé"), "cafe unicode");
/// assert_eq!(sanitize_note("Pagamento à vista #42!"), "Pagamento a vista 42");
/// ```
#[must_use]
pub fn sanitize_note(text: &str) -> String {
    let mut kept = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(fold_letter)
        .filter(|c| is_allowed(*c));

    let note: String = kept.by_ref().take(NOTE_MAX_CHARS).collect();
    let dropped = kept.count();
    if dropped > 0 {
        debug!(dropped, max = NOTE_MAX_CHARS, "note truncated");
    }
    note
}

/// Returns true for the characters a note may contain.
#[inline]
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
}

/// Maps Latin letters that have no canonical decomposition to ASCII.
///
/// Every other character is passed through unchanged.
fn fold_letter(c: char) -> FoldIter {
    let folded: &'static str = match c {
        'ø' => "o",
        'Ø' => "O",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ł' => "l",
        'Ł' => "L",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        _ => return FoldIter::Single(Some(c)),
    };
    FoldIter::Folded(folded.chars())
}

/// Output of [`fold_letter`]: the original character or its replacement.
enum FoldIter {
    Single(Option<char>),
    Folded(std::str::Chars<'static>),
}

impl Iterator for FoldIter {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Self::Single(c) => c.take(),
            Self::Folded(chars) => chars.next(),
        }
    }
}
