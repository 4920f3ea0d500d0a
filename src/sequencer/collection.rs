// Note collection - Insertion-ordered notes owned by the editor session

use crate::pitch::PitchTable;
use crate::sequencer::note::{Note, NoteId};

/// The notes being edited
///
/// Order is insertion order; hit queries scan it front to back. Nothing about
/// the notes is cached, every query reads the current fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all notes
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Append a note
    pub fn add(&mut self, note: Note) -> NoteId {
        let id = note.id();
        self.notes.push(note);
        id
    }

    /// Remove a note by ID
    pub fn remove(&mut self, note_id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id() == note_id)?;
        Some(self.notes.remove(index))
    }

    /// Get a note by ID
    pub fn get(&self, note_id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == note_id)
    }

    /// Get a mutable note by ID
    pub fn get_mut(&mut self, note_id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id() == note_id)
    }

    /// First note covering `time` on display row `row`
    pub fn find_at(&self, time: i64, row: usize, table: &PitchTable) -> Option<&Note> {
        self.notes
            .iter()
            .find(|n| n.contains_time(time) && table.row_of(&n.name).ok() == Some(row))
    }

    /// Replace every note, e.g. after loading a session
    pub fn replace(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    /// Owned copy handed to background playback
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    /// Clear all notes
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl From<Vec<Note>> for NoteCollection {
    fn from(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}
