// Piano roll - library exports for the desktop host, tools, tests and benchmarks

pub mod config;
pub mod editor;
pub mod error;
pub mod messaging;
pub mod midi;
pub mod pitch;
pub mod playback;
pub mod project;
pub mod render;
pub mod sequencer;
pub mod synth;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EditorConfig};
pub use editor::{EditorOutcome, Gesture, GridLayout, HoverFeedback, ScrollStep, TimelineEditor};
pub use error::EditorError;
pub use pitch::{PitchError, PitchTable};
pub use playback::{CancellationToken, PlaybackStatus, Player, Timer};
pub use render::{DrawingBackend, RenderPool, RetainedCanvas};
pub use sequencer::{EventConverter, EventStream, Note, NoteCollection, NoteId, Tempo};
pub use synth::{NullSynth, SynthEngine};
