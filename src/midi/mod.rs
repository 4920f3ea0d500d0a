// MIDI module - Standard MIDI File export of note sessions

pub mod export;

pub use export::{ExportError, TICKS_PER_BEAT, export_notes, write_smf};
