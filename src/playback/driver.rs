// Playback driver - walks an event stream in real time and dispatches to a synth

use crate::playback::CancellationToken;
use crate::render::BackendError;
use crate::sequencer::{EventKind, EventStream, Tempo};
use crate::synth::SynthEngine;
use std::time::Duration;

/// Channel every note is played on
pub const PLAYBACK_CHANNEL: u8 = 0;

/// Source of waits between events
pub trait Timer: Send + Sync {
    fn wait(&self, duration: Duration);
}

/// Timer that sleeps the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

impl Timer for ThreadTimer {
    fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Play a stream, returning the number of events dispatched
///
/// The token is checked before each wait only: an event whose wait has
/// started is dispatched even if the token is cancelled during the wait.
pub fn run_stream(
    stream: &EventStream,
    tempo: Tempo,
    synth: &dyn SynthEngine,
    timer: &dyn Timer,
    token: &CancellationToken,
) -> Result<usize, BackendError> {
    let mut dispatched = 0;

    for event in stream {
        if token.is_cancelled() {
            tracing::debug!(dispatched, "playback cancelled");
            break;
        }

        timer.wait(tempo.wait_for(event.delta));

        match event.kind {
            EventKind::On => synth.note_on(PLAYBACK_CHANNEL, event.pitch, event.velocity)?,
            EventKind::Off => synth.note_off(PLAYBACK_CHANNEL, event.pitch)?,
        }
        dispatched += 1;
    }

    Ok(dispatched)
}
