// Sequencer module - notes, the note collection, tempo and event timing

pub mod collection;
pub mod events;
pub mod note;
pub mod timeline;

pub use collection::NoteCollection;
pub use events::{DeltaEvent, EventConverter, EventError, EventKind, EventStream, TimedEvent};
pub use note::{MAX_NOTE_TIME, Note, NoteId};
pub use timeline::Tempo;
