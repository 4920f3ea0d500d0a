// Playback - background playback and audition of note snapshots
//
// Every play or audition converts an owned snapshot up front, then walks the
// resulting stream on its own thread with its own cancellation token.

pub mod driver;
pub mod status;
pub mod token;

pub use driver::{PLAYBACK_CHANNEL, ThreadTimer, Timer, run_stream};
pub use status::{PlaybackStatus, PlayingGuard, SharedStatus};
pub use token::CancellationToken;

use crate::render::BackendError;
use crate::sequencer::{EventConverter, EventError, Note, Tempo};
use crate::synth::SynthEngine;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Playback errors
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Cannot play notes: {0}")]
    Events(#[from] EventError),

    #[error("Synth error: {0}")]
    Synth(#[from] BackendError),

    #[error("Failed to spawn playback thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Playback thread panicked")]
    Panicked,
}

/// What a background task is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Playback,
    Audition,
}

struct PlaybackTask {
    kind: TaskKind,
    token: CancellationToken,
    /// Playing registration, ended as soon as the task is stopped
    guard: Option<PlayingGuard>,
    handle: JoinHandle<Result<usize, PlaybackError>>,
}

/// Starts, stops and tracks playback threads
pub struct Player {
    synth: Arc<dyn SynthEngine>,
    timer: Arc<dyn Timer>,
    converter: EventConverter,
    status: SharedStatus,
    tasks: Vec<PlaybackTask>,
}

impl Player {
    pub fn new(synth: Arc<dyn SynthEngine>, converter: EventConverter) -> Self {
        Self::with_timer(synth, Arc::new(ThreadTimer), converter)
    }

    pub fn with_timer(
        synth: Arc<dyn SynthEngine>,
        timer: Arc<dyn Timer>,
        converter: EventConverter,
    ) -> Self {
        Self {
            synth,
            timer,
            converter,
            status: SharedStatus::new(),
            tasks: Vec::new(),
        }
    }

    /// Play a snapshot of notes at a tempo
    pub fn play(&mut self, notes: Vec<Note>, tempo: Tempo) -> Result<(), PlaybackError> {
        tracing::info!(notes = notes.len(), %tempo, "starting playback");
        self.spawn(TaskKind::Playback, &notes, tempo)
    }

    /// Play one note from time zero, keeping its duration
    pub fn audition(&mut self, note: &Note, tempo: Tempo) -> Result<(), PlaybackError> {
        tracing::debug!(%note, "audition");
        self.spawn(TaskKind::Audition, &[note.audition_copy()], tempo)
    }

    /// Cancel every live playback and audition
    ///
    /// The status reads Stopped on return; a thread blocked in a wait still
    /// dispatches the event it is waiting for before it exits.
    pub fn stop(&self) {
        for task in &self.tasks {
            task.token.cancel();
            if let Some(guard) = &task.guard {
                guard.release();
            }
        }
        if !self.tasks.is_empty() {
            tracing::info!(tasks = self.tasks.len(), "stopping playback");
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status.get()
    }

    /// Status handle readable from other threads
    pub fn shared_status(&self) -> SharedStatus {
        self.status.clone()
    }

    /// Tasks not yet collected by `reap` or `join_all`
    pub fn live_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Collect finished tasks, returning their failures
    pub fn reap(&mut self) -> Vec<PlaybackError> {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.handle.is_finished());
        self.tasks = running;

        finished.into_iter().filter_map(Self::join).collect()
    }

    /// Block until every task has ended, returning their failures
    pub fn join_all(&mut self) -> Vec<PlaybackError> {
        std::mem::take(&mut self.tasks)
            .into_iter()
            .filter_map(Self::join)
            .collect()
    }

    fn join(task: PlaybackTask) -> Option<PlaybackError> {
        match task.handle.join() {
            Ok(Ok(dispatched)) => {
                tracing::debug!(kind = ?task.kind, dispatched, "playback task finished");
                None
            }
            Ok(Err(e)) => Some(e),
            Err(_) => Some(PlaybackError::Panicked),
        }
    }

    fn spawn(&mut self, kind: TaskKind, notes: &[Note], tempo: Tempo) -> Result<(), PlaybackError> {
        let stream = self.converter.convert(notes)?;

        let token = CancellationToken::new();
        let task_token = token.clone();
        let synth = Arc::clone(&self.synth);
        let timer = Arc::clone(&self.timer);
        let guard = match kind {
            TaskKind::Playback => Some(self.status.begin()),
            TaskKind::Audition => None,
        };

        let task_guard = guard.clone();

        let handle = std::thread::Builder::new()
            .name(format!("{:?}", kind).to_lowercase())
            .spawn(move || {
                let _guard = task_guard;
                let result = run_stream(&stream, tempo, synth.as_ref(), timer.as_ref(), &task_token);
                if let Err(e) = &result {
                    tracing::error!(kind = ?kind, error = %e, "playback failed");
                }
                result.map_err(PlaybackError::from)
            })?;

        self.tasks.push(PlaybackTask {
            kind,
            token,
            guard,
            handle,
        });
        Ok(())
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::NullSynth;
    use std::time::Duration;

    struct InstantTimer;

    impl Timer for InstantTimer {
        fn wait(&self, _duration: Duration) {}
    }

    fn player() -> Player {
        Player::with_timer(
            Arc::new(NullSynth),
            Arc::new(InstantTimer),
            EventConverter::default(),
        )
    }

    #[test]
    fn test_playback_completes() {
        let mut player = player();
        player
            .play(vec![Note::new("C4", 0, 40)], Tempo::default())
            .unwrap();

        assert!(player.join_all().is_empty());
        assert_eq!(player.status(), PlaybackStatus::Stopped);
        assert_eq!(player.live_tasks(), 0);
    }

    #[test]
    fn test_invalid_notes_fail_before_spawn() {
        let mut player = player();
        let result = player.play(vec![Note::new("H9", 0, 40)], Tempo::default());

        assert!(matches!(result, Err(PlaybackError::Events(_))));
        assert_eq!(player.live_tasks(), 0);
    }

    #[test]
    fn test_audition_leaves_status_stopped() {
        let mut player = player();
        player
            .audition(&Note::new("C4", 400, 440), Tempo::default())
            .unwrap();
        assert_eq!(player.status(), PlaybackStatus::Stopped);
        assert!(player.join_all().is_empty());
    }
}
