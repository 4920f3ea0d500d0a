// Playback status shared between the host and playback threads

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped = 0,
    Playing = 1,
}

impl From<usize> for PlaybackStatus {
    /// Status from the number of running full playbacks
    fn from(active: usize) -> Self {
        match active {
            0 => PlaybackStatus::Stopped,
            _ => PlaybackStatus::Playing,
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "Stopped"),
            PlaybackStatus::Playing => write!(f, "Playing"),
        }
    }
}

/// Atomic wrapper to share the status between threads
///
/// Counts running full playbacks; auditions never register here.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    active: Arc<AtomicUsize>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> PlaybackStatus {
        PlaybackStatus::from(self.active.load(Ordering::Acquire))
    }

    pub fn is_playing(&self) -> bool {
        self.get() == PlaybackStatus::Playing
    }

    /// Register a running playback until a guard is released or dropped
    pub fn begin(&self) -> PlayingGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        PlayingGuard {
            registration: Arc::new(Registration {
                active: Arc::clone(&self.active),
                released: AtomicBool::new(false),
            }),
        }
    }
}

#[derive(Debug)]
struct Registration {
    active: Arc<AtomicUsize>,
    released: AtomicBool,
}

/// Keeps the status at Playing until released
///
/// Clones share one registration: the first `release` or drop of any clone
/// ends it, later ones do nothing.
#[derive(Debug, Clone)]
pub struct PlayingGuard {
    registration: Arc<Registration>,
}

impl PlayingGuard {
    pub fn release(&self) {
        let registration = &self.registration;
        if !registration.released.swap(true, Ordering::AcqRel) {
            registration.active.fetch_sub(1, Ordering::AcqRel);
        }
    }

    pub fn is_released(&self) -> bool {
        self.registration.released.load(Ordering::Acquire)
    }
}

impl Drop for PlayingGuard {
    fn drop(&mut self) {
        self.release();
    }
}
