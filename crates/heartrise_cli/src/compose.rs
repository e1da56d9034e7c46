//! Frame composition
//!
//! Draws each sprite's image at its position with its opacity applied,
//! onto a transparent canvas the size of the emitter.

use heartrise_animation::{Bounds, HeartImages, HeartSprite};
use image::{imageops, RgbaImage};

pub fn compose_frame(bounds: Bounds, sprites: &[HeartSprite], images: &HeartImages) -> RgbaImage {
    let width = bounds.width.round().max(1.0) as u32;
    let height = bounds.height.round().max(1.0) as u32;
    let mut canvas = RgbaImage::new(width, height);

    for sprite in sprites {
        let Some(image) = images.get(sprite.image_index) else {
            tracing::warn!("Sprite references missing image {}", sprite.image_index);
            continue;
        };

        let mut faded = image.clone();
        if sprite.opacity < 255 {
            for pixel in faded.pixels_mut() {
                pixel.0[3] = (u16::from(pixel.0[3]) * u16::from(sprite.opacity) / 255) as u8;
            }
        }
        imageops::overlay(
            &mut canvas,
            &faded,
            sprite.x.round() as i64,
            sprite.y.round() as i64,
        );
    }
    canvas
}
