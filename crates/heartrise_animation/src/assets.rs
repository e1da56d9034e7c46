//! Heart image table
//!
//! Images are decoded once during setup and scaled to the configured heart
//! size. The table is read-only afterwards; hearts refer to entries by index.

use crate::error::{HeartError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

/// Scaled RGBA heart sprites
#[derive(Clone, Debug)]
pub struct HeartImages {
    size: u32,
    images: Vec<RgbaImage>,
}

/// Pixel edge length for an image size in layout units
fn pixel_size(size: f32) -> u32 {
    if size.is_finite() {
        size.round().max(1.0) as u32
    } else {
        1
    }
}

impl HeartImages {
    /// Scale already decoded images to `size × size`
    pub fn from_images(images: Vec<DynamicImage>, size: f32) -> Result<Self> {
        if images.is_empty() {
            return Err(HeartError::NoImages);
        }

        let px = pixel_size(size);
        let images = images
            .iter()
            .map(|image| imageops::resize(&image.to_rgba8(), px, px, FilterType::Triangle))
            .collect();
        Ok(Self { size: px, images })
    }

    /// Decode images from files and scale them
    pub fn load_paths<P: AsRef<Path>>(paths: &[P], size: f32) -> Result<Self> {
        let mut decoded = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let image = image::open(path).map_err(|source| HeartError::ImageLoad {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!(
                "Loaded heart image {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            decoded.push(image);
        }
        Self::from_images(decoded, size)
    }

    /// Rasterize a heart shape in each of the given colors
    pub fn hearts(size: f32, colors: &[[u8; 4]]) -> Result<Self> {
        if colors.is_empty() {
            return Err(HeartError::NoImages);
        }

        let px = pixel_size(size);
        let images = colors
            .iter()
            .map(|&color| rasterize_heart(px, Rgba(color)))
            .collect();
        Ok(Self { size: px, images })
    }

    /// Edge length of every image in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.images.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        self.images.iter()
    }
}

/// Fill the implicit heart curve `(x² + y² - 1)³ - x²y³ <= 0`
fn rasterize_heart(px: u32, color: Rgba<u8>) -> RgbaImage {
    let mut image = RgbaImage::new(px, px);
    let scale = 2.6 / px as f32;

    for (ix, iy, pixel) in image.enumerate_pixels_mut() {
        let x = (ix as f32 + 0.5) * scale - 1.3;
        // Flip so the lobes sit at the top
        let y = 1.4 - (iy as f32 + 0.5) * scale;
        let a = x * x + y * y - 1.0;
        if a * a * a - x * x * y * y * y <= 0.0 {
            *pixel = color;
        }
    }
    image
}
