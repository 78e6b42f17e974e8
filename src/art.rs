//! Line assembly and persistence of finished ASCII art.

use crate::Result;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Rows of glyphs produced by one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArt {
    lines: Vec<String>,
    width: usize,
}

impl AsciiArt {
    /// Splits a flat row-major glyph sequence into rows of `width` glyphs.
    ///
    /// When `glyphs.len()` is not a multiple of `width` the last row is
    /// shorter; it is not padded.
    pub fn assemble(glyphs: &[char], width: usize) -> Self {
        let width = width.max(1);
        let lines = glyphs.chunks(width).map(|row| row.iter().collect()).collect();
        Self { lines, width }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Glyphs per full row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Writes every row followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    /// Saves the art as UTF-8 text, one newline-terminated row per line.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Rows joined by `\n`, without a trailing newline.
impl fmt::Display for AsciiArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_exact_rows() {
        let art = AsciiArt::assemble(&chars("abcdef"), 3);
        assert_eq!(art.lines(), ["abc", "def"]);
        assert_eq!(art.height(), 2);
    }

    #[test]
    fn test_short_last_row_kept() {
        let art = AsciiArt::assemble(&chars("abcdefg"), 3);
        assert_eq!(art.lines(), ["abc", "def", "g"]);
        assert_eq!(art.width(), 3);
    }

    #[test]
    fn test_row_count_is_ceiling() {
        for total in 0..40 {
            for width in 1..9 {
                let glyphs = vec!['#'; total];
                let art = AsciiArt::assemble(&glyphs, width);
                assert_eq!(art.height(), total.div_ceil(width));
                let (last, full) = art.lines().split_last().map_or((None, &[][..]), |(l, f)| (Some(l), f));
                assert!(full.iter().all(|line| line.chars().count() == width));
                if let Some(last) = last {
                    assert!((1..=width).contains(&last.chars().count()));
                }
            }
        }
    }

    #[test]
    fn test_zero_width_treated_as_one() {
        let art = AsciiArt::assemble(&chars("ab"), 0);
        assert_eq!(art.lines(), ["a", "b"]);
    }

    #[test]
    fn test_multibyte_glyphs() {
        let art = AsciiArt::assemble(&chars("█▓▒░"), 2);
        assert_eq!(art.to_string(), "█▓\n▒░");
    }

    #[test]
    fn test_display_has_no_trailing_newline() {
        let art = AsciiArt::assemble(&chars("@@@ "), 2);
        assert_eq!(art.to_string(), "@@\n@ ");
    }

    #[test]
    fn test_write_to_terminates_rows() {
        let art = AsciiArt::assemble(&chars("@@@ "), 2);
        let mut out = Vec::new();
        art.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@@\n@ \n");
    }
}
