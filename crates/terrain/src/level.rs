//! Level documents: a height field authored as text grids inside YAML.
//!
//! ```text
//! size: 2
//! base: |
//!   1 1 1
//!   1 2 1
//!   1 1 1
//! offset: |
//!   000
//!   010
//!   000
//! objects: |
//!   C.
//!   .L
//! ```
//!
//! A numeric row containing whitespace is split on whitespace; a row without
//! whitespace is read one digit per character, except in a one-column grid
//! where it is a single integer. Short rows, missing rows and unparsable
//! tokens read as 0.
//!
//! An object grid whose first row starts with a space (an empty cell) needs an
//! explicit YAML indentation indicator, e.g. `objects: |2`. Writing `.` for
//! empty cells avoids this and is what `save_level` emits.
//!
//! `size` is limited to [`MAX_LEVEL_SIZE`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::heightfield::{HeightField, MAX_LEVEL_SIZE, ObjectKind};

/// Errors from loading or saving a level document.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("level size {size} exceeds the maximum of {max}")]
    InvalidSize { size: usize, max: usize },
}

/// On-disk shape of a level: grid size plus five text grids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDocument {
    /// Cells per side.
    pub size: usize,
    /// `(size+1) × (size+1)` corner base heights.
    pub base: String,
    /// `(size+1) × (size+1)` corner offsets.
    pub offset: String,
    /// `size × size` side texture tags.
    pub side_texture: String,
    /// `size × size` top texture tags.
    pub top_texture: String,
    /// `size × size` object characters (`C`, `S`, `L`, space or `.`).
    pub objects: String,
}

impl LevelDocument {
    pub fn from_yaml(text: &str) -> Result<Self, LevelError> {
        let doc: Self = serde_yaml::from_str(text)?;
        if doc.size > MAX_LEVEL_SIZE {
            return Err(LevelError::InvalidSize {
                size: doc.size,
                max: MAX_LEVEL_SIZE,
            });
        }
        Ok(doc)
    }

    pub fn to_yaml(&self) -> Result<String, LevelError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Decode the grids into a height field, recovering from malformed data.
    ///
    /// A size above [`MAX_LEVEL_SIZE`] is clamped with a warning.
    pub fn to_height_field(&self) -> HeightField {
        let size = self.size.min(MAX_LEVEL_SIZE);
        if size != self.size {
            tracing::warn!(size = self.size, max = MAX_LEVEL_SIZE, "level size clamped");
        }
        let corners = size + 1;
        HeightField::from_grids(
            size,
            parse_numeric_grid(&self.base, corners, corners, "base"),
            parse_numeric_grid(&self.offset, corners, corners, "offset"),
            parse_numeric_grid(&self.side_texture, size, size, "side_texture"),
            parse_numeric_grid(&self.top_texture, size, size, "top_texture"),
            parse_object_grid(&self.objects, size),
        )
    }

    pub fn from_height_field(field: &HeightField) -> Self {
        let size = field.size();
        let corners = field.corners_per_side();
        Self {
            size,
            base: format_numeric_grid(field.base_grid(), corners),
            offset: format_numeric_grid(field.offset_grid(), corners),
            side_texture: format_numeric_grid(field.side_texture_grid(), size),
            top_texture: format_numeric_grid(field.top_texture_grid(), size),
            objects: format_object_grid(field.object_grid(), size),
        }
    }
}

/// Load a level file into a height field.
pub fn load_level(path: impl AsRef<Path>) -> Result<HeightField, LevelError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let doc = LevelDocument::from_yaml(&text)?;
    tracing::debug!(path = %path.as_ref().display(), size = doc.size, "loaded level");
    Ok(doc.to_height_field())
}

/// Write a height field as a level file.
pub fn save_level(field: &HeightField, path: impl AsRef<Path>) -> Result<(), LevelError> {
    let text = LevelDocument::from_height_field(field).to_yaml()?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Parse a `rows × cols` integer grid. Never fails: anything missing or
/// malformed becomes 0 and is logged.
pub fn parse_numeric_grid(text: &str, rows: usize, cols: usize, label: &str) -> Vec<i32> {
    let mut grid = vec![0; rows * cols];
    if text.trim().is_empty() {
        return grid;
    }

    let mut lines = text.lines();
    for row in 0..rows {
        let Some(line) = lines.next() else {
            tracing::warn!(grid = label, row, "missing row, using zeros");
            continue;
        };
        let tokens: Vec<String> = if line.trim().contains(char::is_whitespace) {
            line.split_whitespace().map(str::to_owned).collect()
        } else if cols == 1 {
            vec![line.trim().to_owned()]
        } else {
            line.trim().chars().map(String::from).collect()
        };
        if tokens.len() < cols {
            tracing::warn!(
                grid = label,
                row,
                found = tokens.len(),
                expected = cols,
                "short row, padding with zeros"
            );
        }
        for (col, token) in tokens.iter().take(cols).enumerate() {
            grid[row * cols + col] = token.parse().unwrap_or_else(|_| {
                tracing::warn!(grid = label, row, col, token = %token, "non-numeric entry, using 0");
                0
            });
        }
    }
    if lines.any(|l| !l.trim().is_empty()) {
        tracing::warn!(grid = label, rows, "extra rows ignored");
    }
    grid
}

/// Write an integer grid as space-separated rows.
pub fn format_numeric_grid(values: &[i32], cols: usize) -> String {
    let mut out = String::new();
    if cols == 0 {
        return out;
    }
    for row in values.chunks(cols) {
        let line: Vec<String> = row.iter().map(i32::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Parse a `size × size` object character grid. Short rows are empty cells;
/// unknown characters are empty and logged.
pub fn parse_object_grid(text: &str, size: usize) -> Vec<ObjectKind> {
    let mut grid = vec![ObjectKind::None; size * size];
    for (row, line) in text.lines().take(size).enumerate() {
        for (col, c) in line.chars().take(size).enumerate() {
            grid[row * size + col] = ObjectKind::from_char(c).unwrap_or_else(|| {
                tracing::warn!(row, col, ch = %c, "unknown object character, treating as empty");
                ObjectKind::None
            });
        }
    }
    grid
}

/// Write an object grid, one character per cell, `.` for empty.
pub fn format_object_grid(objects: &[ObjectKind], size: usize) -> String {
    let mut out = String::new();
    if size == 0 {
        return out;
    }
    for row in objects.chunks(size) {
        out.extend(row.iter().map(|o| o.to_char()));
        out.push('\n');
    }
    out
}
