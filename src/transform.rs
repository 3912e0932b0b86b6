//! In-place palette substitution over decoded images
//!
//! The transform is a single row-major pass with an exact-match table
//! lookup per pixel. No blending, no alpha compositing, no allocation.
//! Because each pixel is visited exactly once and looked up by its value
//! *before* the write, substitutions never cascade within one pass: with a
//! palette `K->V, V->W`, a pixel that starts as `K` ends as `V`, not `W`.

use image::RgbaImage;

use crate::palette::PaletteMap;

/// Apply a palette's substitution table to an image, in place.
///
/// Pixels whose packed value is absent from the palette are left untouched.
pub fn apply_palette(image: &mut RgbaImage, palette: &PaletteMap) {
    if palette.is_empty() {
        return;
    }
    for pixel in image.pixels_mut() {
        let old = u32::from_le_bytes(pixel.0);
        if let Some(&new) = palette.get(&old) {
            if new != old {
                pixel.0 = new.to_le_bytes();
            }
        }
    }
}
