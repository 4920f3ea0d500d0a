// Grid layout - pointer coordinates to grid time and pitch rows

use crate::config::EditorConfig;

/// Geometry of the editing grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Horizontal snapping unit, in time units (one time unit = one pixel)
    pub cell_width: i64,
    pub row_height: i64,
    pub visible_width: i64,
    pub visible_height: i64,
    pub resize_gap: i64,
    pub min_note_width: i64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for GridLayout {
    fn from(config: &EditorConfig) -> Self {
        Self {
            cell_width: config.cell_width,
            row_height: config.row_height,
            visible_width: config.visible_width,
            visible_height: config.visible_height,
            resize_gap: config.resize_gap,
            min_note_width: config.min_note_width,
        }
    }
}

impl GridLayout {
    /// Snap a time down to the start of its cell
    pub fn snap_time(&self, time: i64) -> i64 {
        time.div_euclid(self.cell_width) * self.cell_width
    }

    /// Cell index of a time
    pub fn cell_index(&self, time: i64) -> i64 {
        time.div_euclid(self.cell_width)
    }

    /// Row under a y coordinate; may lie outside the table
    pub fn row_at(&self, y: i64) -> i64 {
        y.div_euclid(self.row_height)
    }

    /// Row under a y coordinate, clamped to `row_count` rows
    pub fn clamped_row_at(&self, y: i64, row_count: usize) -> usize {
        self.row_at(y).clamp(0, row_count.saturating_sub(1) as i64) as usize
    }

    /// Top edge of a row
    pub fn row_top(&self, row: usize) -> i64 {
        row as i64 * self.row_height
    }

    /// Scroll amount of one scroll unit
    pub fn scroll_unit(&self) -> i64 {
        self.cell_width
    }
}
