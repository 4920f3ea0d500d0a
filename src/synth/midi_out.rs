// MIDI output synth - sends note messages to an external MIDI port

use crate::render::BackendError;
use crate::synth::SynthEngine;
use midir::{MidiOutput, MidiOutputConnection};
use std::sync::Mutex;

const CLIENT_NAME: &str = "Piano Roll MIDI Output";
const CONNECTION_NAME: &str = "pianoroll-output";

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

/// Errors opening a MIDI output
#[derive(Debug, thiserror::Error)]
pub enum MidiOutError {
    #[error("Failed to initialize MIDI output: {0}")]
    Init(String),

    #[error("No MIDI output port available")]
    NoPorts,

    #[error("MIDI output port '{0}' not found")]
    PortNotFound(String),

    #[error("Failed to connect to MIDI output: {0}")]
    Connect(String),
}

/// Synth engine backed by a MIDI output connection
pub struct MidiOutSynth {
    port_name: String,
    connection: Mutex<MidiOutputConnection>,
}

impl MidiOutSynth {
    /// Names of the output ports currently available
    pub fn port_names() -> Vec<String> {
        let Ok(midi_out) = MidiOutput::new(CLIENT_NAME) else {
            return Vec::new();
        };

        midi_out
            .ports()
            .iter()
            .filter_map(|port| midi_out.port_name(port).ok())
            .collect()
    }

    /// Connect to the named port, or to the first port when `port_name` is None
    pub fn connect(port_name: Option<&str>) -> Result<Self, MidiOutError> {
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| MidiOutError::Init(e.to_string()))?;
        let ports = midi_out.ports();

        let port = match port_name {
            Some(wanted) => ports
                .iter()
                .find(|p| midi_out.port_name(p).map(|name| name == wanted).unwrap_or(false))
                .ok_or_else(|| MidiOutError::PortNotFound(wanted.to_string()))?,
            None => ports.first().ok_or(MidiOutError::NoPorts)?,
        };

        let name = midi_out
            .port_name(port)
            .map_err(|e| MidiOutError::Connect(e.to_string()))?;
        let connection = midi_out
            .connect(port, CONNECTION_NAME)
            .map_err(|e| MidiOutError::Connect(e.to_string()))?;

        tracing::info!(port = %name, "MIDI output connected");
        Ok(Self {
            port_name: name,
            connection: Mutex::new(connection),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn send(&self, message: [u8; 3]) -> Result<(), BackendError> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| BackendError::Rejected("MIDI output lock poisoned".to_string()))?;

        connection
            .send(&message)
            .map_err(|e| BackendError::Rejected(format!("MIDI send failed: {}", e)))
    }
}

impl SynthEngine for MidiOutSynth {
    fn note_on(&self, channel: u8, pitch: u8, velocity: u8) -> Result<(), BackendError> {
        self.send(note_on_message(channel, pitch, velocity))
    }

    fn note_off(&self, channel: u8, pitch: u8) -> Result<(), BackendError> {
        self.send(note_off_message(channel, pitch))
    }
}

/// Raw note-on bytes; out of range values are masked into their fields
pub fn note_on_message(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    [NOTE_ON | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F]
}

/// Raw note-off bytes with release velocity 0
pub fn note_off_message(channel: u8, pitch: u8) -> [u8; 3] {
    [NOTE_OFF | (channel & 0x0F), pitch & 0x7F, 0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_bytes() {
        assert_eq!(note_on_message(0, 48, 90), [0x90, 48, 90]);
        assert_eq!(note_off_message(0, 48), [0x80, 48, 0]);
        assert_eq!(note_on_message(3, 60, 100), [0x93, 60, 100]);
    }

    #[test]
    fn test_message_masking() {
        assert_eq!(note_on_message(0x12, 200, 255), [0x92, 200 & 0x7F, 0x7F]);
    }
}
