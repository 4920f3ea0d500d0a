// Note representation for the editor
// A note is a named pitch spanning [start_time, end_time) in grid time units

use crate::pitch::{self, PitchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Latest time a stored note may reach
pub const MAX_NOTE_TIME: i64 = i32::MAX as i64;

/// Unique identifier for notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pitched event on the timeline
///
/// Times are grid/pixel units on the editor's x axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identity, fixed for the lifetime of the note
    id: NoteId,

    /// Pitch name, e.g. "C#4"
    pub name: String,

    pub start_time: i64,

    pub end_time: i64,
}

impl Note {
    /// Creates a new note with a fresh identity
    pub fn new(name: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            id: NoteId::new(),
            name: name.into(),
            start_time,
            end_time,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Semitone value derived from the name
    pub fn value(&self) -> Result<u8, PitchError> {
        pitch::name_to_value(&self.name)
    }

    /// Check if this note covers a given time
    pub fn contains_time(&self, time: i64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// A copy of this note moved to time 0, used for auditioning
    pub fn audition_copy(&self) -> Note {
        Note::new(self.name.clone(), 0, self.duration())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note({}, {}, {})", self.name, self.start_time, self.end_time)
    }
}
