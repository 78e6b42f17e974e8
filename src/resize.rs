//! Target-size computation and resampling.

use crate::settings::Settings;
use crate::{AsciifyError, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Resampling filter used when the image is scaled to the glyph grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Interpolation> for FilterType {
    fn from(filter: Interpolation) -> Self {
        match filter {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Triangle => FilterType::Triangle,
            Interpolation::CatmullRom => FilterType::CatmullRom,
            Interpolation::Gaussian => FilterType::Gaussian,
            Interpolation::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(format!(
                "unknown filter `{other}` (expected nearest, triangle, catmull-rom, gaussian or lanczos3)"
            )),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        })
    }
}

/// How fractional target dimensions become whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Round half away from zero.
    #[default]
    Nearest,
    /// Truncate toward zero.
    Floor,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Nearest => value.round(),
            Self::Floor => value.floor(),
        }
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "round" => Ok(Self::Nearest),
            "floor" | "truncate" => Ok(Self::Floor),
            other => Err(format!("unknown rounding `{other}` (expected nearest or floor)")),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nearest => "nearest",
            Self::Floor => "floor",
        })
    }
}

/// Largest glyph grid (and resampling pass) accepted, in cells. Matches the
/// `image` crate's default 512 MiB allocation limit at 8 bytes per cell.
pub const MAX_CELLS: u64 = 512 * 1024 * 1024 / 8;

/// Glyph grid size for a source image of `src_width` x `src_height` pixels.
///
/// Columns are `width * detail`; rows follow the source aspect ratio scaled
/// by `height_ratio`. Both are rounded per [`Rounding`] and clamped to at
/// least one cell.
///
/// # Errors
/// [`AsciifyError::InvalidDimensions`] for an empty source image or a grid
/// whose area, or whose intermediate resampling pass, exceeds [`MAX_CELLS`].
pub fn target_dimensions(src_width: u32, src_height: u32, settings: &Settings) -> Result<(u32, u32)> {
    if src_width == 0 || src_height == 0 {
        return Err(AsciifyError::InvalidDimensions {
            width: f64::from(src_width),
            height: f64::from(src_height),
        });
    }

    let width = f64::from(settings.width());
    let detail = settings.detail();
    let aspect_ratio = f64::from(src_height) / f64::from(src_width);

    let cols = settings.rounding().apply(width * detail);
    let rows = settings
        .rounding()
        .apply(width * aspect_ratio * settings.height_ratio() * detail);

    match (to_cells(cols), to_cells(rows)) {
        (Some(c), Some(r)) if within_limit(c.max(src_width), r) => Ok((c, r)),
        _ => Err(AsciifyError::InvalidDimensions { width: cols, height: rows }),
    }
}

// the vertical pass runs at source width before columns are resampled
fn within_limit(width: u32, rows: u32) -> bool {
    u64::from(width)
        .checked_mul(u64::from(rows))
        .is_some_and(|cells| cells <= MAX_CELLS)
}

fn to_cells(value: f64) -> Option<u32> {
    if !value.is_finite() || value > f64::from(u32::MAX) {
        return None;
    }
    Some((value as u32).max(1))
}

/// Resampled copy of `image` at exactly `width` x `height`.
pub fn resize(image: &DynamicImage, width: u32, height: u32, filter: Interpolation) -> DynamicImage {
    if (image.width(), image.height()) == (width, height) {
        return image.clone();
    }
    debug!(
        "resizing {}x{} -> {width}x{height} ({filter})",
        image.width(),
        image.height()
    );
    image.resize_exact(width, height, filter.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Setting;
    use image::{GrayImage, Luma};

    fn settings(updates: Vec<Setting>) -> Settings {
        let mut settings = Settings::default();
        settings.apply(updates).unwrap();
        settings
    }

    #[test]
    fn test_square_image_default_settings() {
        let dims = target_dimensions(200, 200, &Settings::default()).unwrap();
        assert_eq!(dims, (100, 55));
    }

    #[test]
    fn test_detail_scales_both_axes() {
        let s = settings(vec![Setting::Width(40), Setting::HeightRatio(1.0), Setting::Detail(0.5)]);
        assert_eq!(target_dimensions(100, 50, &s).unwrap(), (20, 10));
    }

    #[test]
    fn test_rounding_modes_differ_at_half() {
        let nearest = settings(vec![Setting::Width(3), Setting::Detail(0.5), Setting::HeightRatio(1.0)]);
        assert_eq!(target_dimensions(10, 10, &nearest).unwrap(), (2, 2));

        let floor = settings(vec![
            Setting::Width(3),
            Setting::Detail(0.5),
            Setting::HeightRatio(1.0),
            Setting::Rounding(Rounding::Floor),
        ]);
        assert_eq!(target_dimensions(10, 10, &floor).unwrap(), (1, 1));
    }

    #[test]
    fn test_dimensions_clamped_to_one() {
        // 1 * (1/1000) * 0.55 rounds to 0 rows
        let s = settings(vec![Setting::Width(1), Setting::Rounding(Rounding::Floor)]);
        assert_eq!(target_dimensions(1000, 1, &s).unwrap(), (1, 1));
    }

    #[test]
    fn test_empty_source_rejected() {
        let err = target_dimensions(0, 10, &Settings::default()).unwrap_err();
        assert!(matches!(err, AsciifyError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let s = settings(vec![Setting::Width(u32::MAX), Setting::Detail(4.0)]);
        let err = target_dimensions(10, 10, &s).unwrap_err();
        assert!(matches!(err, AsciifyError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_oversized_area_rejected() {
        // each side fits in u32, the area does not fit in memory
        let s = settings(vec![Setting::Width(200_000), Setting::HeightRatio(100.0), Setting::Detail(1.0)]);
        let err = target_dimensions(1, 1, &s).unwrap_err();
        assert!(matches!(
            err,
            AsciifyError::InvalidDimensions { width, height } if width == 200_000.0 && height == 20_000_000.0
        ));
    }

    #[test]
    fn test_tall_source_pass_rejected() {
        // 1 column output but the source-width pass would be huge
        let s = settings(vec![Setting::Width(1), Setting::HeightRatio(10_000.0)]);
        assert!(target_dimensions(100_000, 100_000, &s).is_err());
    }

    #[test]
    fn test_area_at_limit_accepted() {
        let s = settings(vec![Setting::Width(8192), Setting::HeightRatio(1.0)]);
        assert_eq!(target_dimensions(8192, 8192, &s).unwrap(), (8192, 8192));
        assert_eq!(8192 * 8192, MAX_CELLS);
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(3, 2, |x, y| Luma([(x * 10 + y) as u8])));
        let out = resize(&img, 3, 2, Interpolation::Lanczos3);
        assert_eq!(out, img);
    }

    #[test]
    fn test_resize_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(64, 48));
        let out = resize(&img, 16, 5, Interpolation::Triangle);
        assert_eq!((out.width(), out.height()), (16, 5));
    }

    #[test]
    fn test_filter_names() {
        assert_eq!("bilinear".parse::<Interpolation>().unwrap(), Interpolation::Triangle);
        assert_eq!("Bicubic".parse::<Interpolation>().unwrap(), Interpolation::CatmullRom);
        assert!("cubic-spline".parse::<Interpolation>().is_err());
        assert_eq!("floor".parse::<Rounding>().unwrap(), Rounding::Floor);
        assert_eq!(Interpolation::Lanczos3.to_string(), "lanczos3");
    }
}
