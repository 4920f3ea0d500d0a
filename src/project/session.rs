// Session files - the note list and tempo of one editing session

use crate::sequencer::{MAX_NOTE_TIME, Note, Tempo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Current session format version
pub const SESSION_VERSION: u32 = 1;

/// File extension of session files
pub const SESSION_EXTENSION: &str = "notes";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported session version {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid session: {0}")]
    InvalidStructure(String),
}

/// On-disk session contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: u32,
    /// RFC 3339 time of the save
    #[serde(default)]
    pub saved_at: String,
    pub tempo_bpm: f64,
    pub notes: Vec<Note>,
}

impl SessionFile {
    pub fn new(notes: Vec<Note>, tempo: Tempo) -> Self {
        Self {
            version: SESSION_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            tempo_bpm: tempo.bpm(),
            notes,
        }
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::clamped(self.tempo_bpm)
    }
}

/// Serialize a session to pretty RON
pub fn serialize_session(session: &SessionFile) -> Result<String, SessionError> {
    ron::ser::to_string_pretty(session, ron::ser::PrettyConfig::default()).map_err(|e| {
        SessionError::Serialization(format!("Failed to serialize session to RON: {}", e))
    })
}

/// Parse and validate a session
pub fn deserialize_session(ron_data: &str) -> Result<SessionFile, SessionError> {
    let session: SessionFile = ron::from_str(ron_data)?;
    validate_session(&session)?;
    Ok(session)
}

/// Check version, tempo and every note of a session
pub fn validate_session(session: &SessionFile) -> Result<(), SessionError> {
    if session.version == 0 || session.version > SESSION_VERSION {
        return Err(SessionError::UnsupportedVersion(session.version));
    }

    if !(Tempo::MIN_BPM..=Tempo::MAX_BPM).contains(&session.tempo_bpm) {
        return Err(SessionError::InvalidStructure(format!(
            "Tempo must be between {} and {} BPM, got {}",
            Tempo::MIN_BPM,
            Tempo::MAX_BPM,
            session.tempo_bpm
        )));
    }

    let mut ids = HashSet::new();
    for note in &session.notes {
        if !ids.insert(note.id()) {
            return Err(SessionError::InvalidStructure(format!(
                "Duplicate note ID {}",
                note.id()
            )));
        }

        crate::pitch::PitchTable::shared()
            .index_of(&note.name)
            .map_err(|e| SessionError::InvalidStructure(format!("{}: {}", note, e)))?;

        if note.start_time < 0
            || note.end_time <= note.start_time
            || note.end_time > MAX_NOTE_TIME
        {
            return Err(SessionError::InvalidStructure(format!(
                "{} has an invalid span",
                note
            )));
        }
    }

    Ok(())
}

/// Write notes and tempo to a session file
pub fn save_session(path: &Path, notes: &[Note], tempo: Tempo) -> Result<(), SessionError> {
    let session = SessionFile::new(notes.to_vec(), tempo);
    let text = serialize_session(&session)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;

    tracing::info!(path = %path.display(), notes = notes.len(), "session saved");
    Ok(())
}

/// Read a session file
pub fn load_session(path: &Path) -> Result<SessionFile, SessionError> {
    let text = std::fs::read_to_string(path)?;
    let session = deserialize_session(&text)?;

    tracing::info!(path = %path.display(), notes = session.notes.len(), "session loaded");
    Ok(session)
}

/// Append the session extension unless the path already ends with it
pub fn with_session_extension(path: PathBuf) -> PathBuf {
    if path.extension() == Some(OsStr::new(SESSION_EXTENSION)) {
        return path;
    }

    let mut name = path.into_os_string();
    name.push(".");
    name.push(SESSION_EXTENSION);
    PathBuf::from(name)
}
