//! Glyph ramps and brightness quantization.

use crate::{AsciifyError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ten-level ramp, densest first.
pub const STANDARD: &str = "@%#*+=-:. ";
/// Unicode shade blocks, densest first.
pub const BLOCKS: &str = "█▓▒░ ";
/// Five-level ramp for small outputs.
pub const SIMPLE: &str = "#+-. ";

/// Index into a ramp of `levels` glyphs for a brightness value.
///
/// Computes `floor(brightness * (levels - 1) / 255)` in integers, so
/// brightness 255 lands exactly on the last glyph.
pub fn glyph_index(brightness: u8, levels: usize) -> usize {
    if levels <= 1 {
        return 0;
    }
    (usize::from(brightness) * (levels - 1) / 255).min(levels - 1)
}

/// Non-empty ordered glyph ramp. Index 0 is used for brightness 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    glyphs: Vec<char>,
}

impl Charset {
    pub fn new(glyphs: &str) -> Result<Self> {
        Self::from_chars(glyphs.chars().collect())
    }

    pub fn from_chars(glyphs: Vec<char>) -> Result<Self> {
        if glyphs.is_empty() {
            return Err(AsciifyError::InvalidSettingValue {
                key: "charset".into(),
                reason: "must contain at least one character".into(),
            });
        }
        Ok(Self { glyphs })
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Same glyphs, lightest first.
    pub fn reversed(&self) -> Self {
        Self {
            glyphs: self.glyphs.iter().rev().copied().collect(),
        }
    }

    pub fn glyph(&self, brightness: u8) -> char {
        self.glyphs[glyph_index(brightness, self.glyphs.len())]
    }

    /// Maps a flat row-major brightness buffer to glyphs.
    pub fn map_brightness(&self, brightness: &[u8]) -> Vec<char> {
        let lut = self.lookup_table();
        brightness.iter().map(|&b| lut[usize::from(b)]).collect()
    }

    // One entry per brightness level, built once per conversion
    fn lookup_table(&self) -> [char; 256] {
        let mut lut = [self.glyphs[0]; 256];
        for (level, slot) in (0..=u8::MAX).zip(lut.iter_mut()) {
            *slot = self.glyph(level);
        }
        lut
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self {
            glyphs: STANDARD.chars().collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.glyphs.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
