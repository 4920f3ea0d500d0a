// Pitch model - name <-> value mapping and row layout
// Value = index in the chromatic scale + 12 * octave, octave 0 starts the table

use std::sync::OnceLock;

/// The 12 chromatic pitch classes, in ascending order
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Highest supported octave (B8 = 107)
pub const MAX_OCTAVE: u8 = 8;

/// Lowest octave shown as a row in the editor
pub const FIRST_PLAYABLE_OCTAVE: u8 = 1;

/// Highest representable pitch value
pub const MAX_PITCH_VALUE: u8 = PITCH_CLASSES.len() as u8 * (MAX_OCTAVE + 1) - 1;

/// Pitch conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PitchError {
    #[error("Invalid pitch name: {0:?}")]
    InvalidPitchName(String),

    #[error("Pitch out of range: {0}")]
    PitchOutOfRange(String),
}

/// Convert a pitch name such as "C#4" to its semitone value
pub fn name_to_value(name: &str) -> Result<u8, PitchError> {
    let letter = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let octave = &name[letter.len()..];

    let index = PITCH_CLASSES
        .iter()
        .position(|class| *class == letter)
        .ok_or_else(|| PitchError::InvalidPitchName(name.to_string()))?;

    let octave: u32 = octave
        .parse()
        .map_err(|_| PitchError::InvalidPitchName(name.to_string()))?;

    if octave > MAX_OCTAVE as u32 {
        return Err(PitchError::PitchOutOfRange(name.to_string()));
    }

    Ok(index as u8 + 12 * octave as u8)
}

/// Convert a semitone value back to its pitch name
pub fn value_to_name(value: u8) -> Result<String, PitchError> {
    if value > MAX_PITCH_VALUE {
        return Err(PitchError::PitchOutOfRange(value.to_string()));
    }

    let class = PITCH_CLASSES[(value % 12) as usize];
    Ok(format!("{}{}", class, value / 12))
}

/// Black-key pitches carry an accidental
pub fn is_sharp(name: &str) -> bool {
    name.contains('#')
}

/// Ordered list of the pitches the editor lays out as rows
///
/// The list is ascending (C1 first); rows are counted from the top, so the
/// highest pitch sits on row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchTable {
    names: Vec<String>,
}

impl PitchTable {
    /// Build the playable range, octaves 1 through 8
    pub fn playable() -> Self {
        let names = (FIRST_PLAYABLE_OCTAVE..=MAX_OCTAVE)
            .flat_map(|octave| {
                PITCH_CLASSES
                    .iter()
                    .map(move |class| format!("{}{}", class, octave))
            })
            .collect();

        Self { names }
    }

    /// Shared instance of the playable table
    pub fn shared() -> &'static PitchTable {
        static TABLE: OnceLock<PitchTable> = OnceLock::new();
        TABLE.get_or_init(PitchTable::playable)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a pitch in ascending order
    pub fn index_of(&self, name: &str) -> Result<usize, PitchError> {
        match self.names.iter().position(|n| n == name) {
            Some(index) => Ok(index),
            None => {
                // Distinguish malformed names from well-formed ones outside the rows
                name_to_value(name)?;
                Err(PitchError::PitchOutOfRange(name.to_string()))
            }
        }
    }

    /// Display row of a pitch (0 = top = highest pitch)
    pub fn row_of(&self, name: &str) -> Result<usize, PitchError> {
        Ok(self.len() - 1 - self.index_of(name)?)
    }

    /// Pitch name displayed on a row
    pub fn name_for_row(&self, row: usize) -> Option<&str> {
        if row >= self.len() {
            return None;
        }
        Some(&self.names[self.len() - 1 - row])
    }

    /// Pitch names from top row to bottom row
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.names.iter().rev().map(String::as_str)
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::playable()
    }
}
