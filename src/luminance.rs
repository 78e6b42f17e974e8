//! Color to brightness reduction using ITU-R BT.601 weights.

use image::{DynamicImage, GrayImage, Luma};

// BT.601 weights scaled by 2^16; they sum to exactly 65536
const R_WEIGHT: u32 = 19_595;
const G_WEIGHT: u32 = 38_470;
const B_WEIGHT: u32 = 7_471;

/// Brightness of an RGB sample, rounded to the nearest level.
#[inline]
pub fn luma([r, g, b]: [u8; 3]) -> u8 {
    let weighted = R_WEIGHT * u32::from(r) + G_WEIGHT * u32::from(g) + B_WEIGHT * u32::from(b);
    ((weighted + 0x8000) >> 16) as u8
}

/// One brightness value per pixel. 8-bit grayscale input passes through;
/// everything else is read as 8-bit RGB with alpha ignored.
pub fn reduce(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let mut out = GrayImage::new(rgb.width(), rgb.height());
    for (dst, src) in out.pixels_mut().zip(rgb.pixels()) {
        *dst = Luma([luma(src.0)]);
    }
    out
}
