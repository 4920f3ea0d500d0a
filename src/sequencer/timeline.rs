// Timeline - Tempo and real-time scaling of event deltas

use std::fmt;
use std::time::Duration;

/// Tempo in whole BPM (Beats Per Minute)
///
/// Files store the plain BPM number; a `Tempo` only comes out of `new` or
/// `clamped`, so it always holds a whole number in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Tempo against which event deltas are expressed in milliseconds
    pub const REFERENCE_BPM: f64 = 120.0;

    pub const MIN_BPM: f64 = 1.0;
    pub const MAX_BPM: f64 = 300.0;

    /// Creates a new tempo, rounded to the nearest whole BPM
    /// BPM must be in range [1.0, 300.0]
    pub fn new(bpm: f64) -> Self {
        assert!(
            (Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm),
            "BPM must be between 1 and 300"
        );
        Self { bpm: bpm.round() }
    }

    /// Creates a tempo, rounding and clamping the BPM into the supported range
    pub fn clamped(bpm: f64) -> Self {
        let bpm = if bpm.is_finite() {
            bpm.round().clamp(Self::MIN_BPM, Self::MAX_BPM)
        } else {
            Self::REFERENCE_BPM
        };
        Self { bpm }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Factor applied to event deltas for live playback
    pub fn wait_scale(&self) -> f64 {
        Self::REFERENCE_BPM / self.bpm
    }

    /// Real time to wait for a raw event delta (delta is in ms at the reference tempo)
    pub fn wait_for(&self, delta: u64) -> Duration {
        Duration::from_secs_f64(delta as f64 * self.wait_scale() / 1000.0)
    }

    /// Microseconds per beat, as written to the tempo meta event of a MIDI file
    pub fn microseconds_per_beat(&self) -> u32 {
        60_000_000 / (self.bpm as u32).max(1)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(Self::REFERENCE_BPM)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} BPM", self.bpm)
    }
}
