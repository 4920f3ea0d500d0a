// Synth module - sound output reached by playback and audition
//
// Engines take `&self` so several playback threads can share one behind an Arc.

pub mod midi_out;

pub use midi_out::MidiOutSynth;

use crate::render::BackendError;

/// Note-level interface of a synthesis engine
pub trait SynthEngine: Send + Sync {
    fn note_on(&self, channel: u8, pitch: u8, velocity: u8) -> Result<(), BackendError>;

    fn note_off(&self, channel: u8, pitch: u8) -> Result<(), BackendError>;
}

/// Engine that only logs, used when no MIDI output is available
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSynth;

impl SynthEngine for NullSynth {
    fn note_on(&self, channel: u8, pitch: u8, velocity: u8) -> Result<(), BackendError> {
        tracing::debug!(channel, pitch, velocity, "note on (no output)");
        Ok(())
    }

    fn note_off(&self, channel: u8, pitch: u8) -> Result<(), BackendError> {
        tracing::debug!(channel, pitch, "note off (no output)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_null_synth_accepts_everything() {
        let synth: Arc<dyn SynthEngine> = Arc::new(NullSynth);
        assert!(synth.note_on(0, 48, 90).is_ok());
        assert!(synth.note_off(0, 48).is_ok());
    }
}
