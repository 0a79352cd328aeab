//! Free-text notes attached to connections and transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// The maximum number of characters allowed in a note.
pub const MAX_NOTE_LENGTH: usize = 1000;

/// A validated, non-empty note of at most [MAX_NOTE_LENGTH] characters.
///
/// Notes are optional everywhere they are used, so an empty note is
/// represented as `None` rather than an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Note(String);

impl Note {
    /// Parse an optional note from user input.
    ///
    /// Leading and trailing whitespace is removed and an empty string yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::NoteTooLong] if `text` has more
    /// than [MAX_NOTE_LENGTH] characters after trimming.
    pub fn parse(text: &str) -> Result<Option<Self>, Error> {
        let text = text.trim();

        if text.is_empty() {
            return Ok(None);
        }

        let length = text.graphemes(true).count();

        if length > MAX_NOTE_LENGTH {
            Err(Error::NoteTooLong(length))
        } else {
            Ok(Some(Self(text.to_owned())))
        }
    }

    /// Create a note without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_owned())
    }

    /// The text of the note.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Note {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
