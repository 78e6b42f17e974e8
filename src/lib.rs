//! Image to ASCII art converter using luminance-ranked glyph ramps.
//!
//! The pipeline resizes the image (compensating for tall character cells),
//! reduces it to one brightness value per pixel, maps each value onto a
//! charset ordered darkest-first and reflows the glyphs into rows.
//!
//! ```no_run
//! use asciify::{Converter, Setting};
//!
//! let mut converter = Converter::new();
//! converter.update_settings([Setting::Width(80), Setting::Detail(0.5)])?;
//! let art = converter.convert_path("photo.jpg")?;
//! art.save("photo.txt")?;
//! # Ok::<(), asciify::AsciifyError>(())
//! ```

pub mod art;
pub mod glyph;
pub mod luminance;
pub mod resize;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use art::AsciiArt;
pub use glyph::Charset;
pub use resize::{Interpolation, Rounding};
pub use settings::{Setting, Settings};

use image::DynamicImage;
use log::debug;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciifyError {
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),
    #[error("Invalid value for setting `{key}`: {reason}")]
    InvalidSettingValue { key: String, reason: String },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Conversion error: {0}")]
    Conversion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AsciifyError>;

/// Runs the full pipeline against an explicit settings snapshot.
///
/// The caller's image is only read; every intermediate is a fresh buffer.
pub fn convert(image: &DynamicImage, settings: &Settings) -> Result<AsciiArt> {
    let (cols, rows) = resize::target_dimensions(image.width(), image.height(), settings)?;
    debug!(
        "converting {}x{} image to {cols}x{rows} glyphs",
        image.width(),
        image.height()
    );

    let resized = resize::resize(image, cols, rows, settings.filter());
    let brightness = luminance::reduce(&resized);
    let glyphs = settings.charset().map_brightness(brightness.as_raw());
    debug_assert_eq!(glyphs.len(), cols as usize * rows as usize);

    Ok(AsciiArt::assemble(&glyphs, cols as usize))
}

/// Converter holding the settings used by successive conversions.
///
/// Updates need `&mut self` while conversions borrow the settings shared,
/// so a conversion can never observe a half-applied update. Wrap the
/// converter in a lock to update it from several threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    settings: Settings,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies typed updates; nothing changes unless every update is valid.
    pub fn update_settings<I>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = Setting>,
    {
        self.settings.apply(updates)
    }

    /// Applies updates keyed by setting name, e.g. from a form or a file.
    pub fn update_settings_json(
        &mut self,
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        self.settings.apply_json(values)
    }

    /// Same as [`Converter::update_settings_json`] for a JSON object in text form.
    pub fn update_settings_json_str(&mut self, text: &str) -> Result<()> {
        self.settings.apply_json_str(text)
    }

    pub fn convert(&self, image: &DynamicImage) -> Result<AsciiArt> {
        convert(image, &self.settings)
    }

    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<AsciiArt> {
        let image = image::open(path.as_ref())?;
        self.convert(&image)
    }
}
