// Error types - aggregate of every domain error the editor surfaces

use crate::config::ConfigError;
use crate::midi::export::ExportError;
use crate::pitch::PitchError;
use crate::playback::PlaybackError;
use crate::project::SessionError;
use crate::render::BackendError;
use crate::sequencer::EventError;

/// Any failure of an editor, playback, export or session operation
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Pitch error: {0}")]
    Pitch(#[from] PitchError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Event error: {0}")]
    Events(#[from] EventError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type EditorResult<T> = Result<T, EditorError>;
