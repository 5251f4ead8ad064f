use std::path::Path;

use image::{imageops, RgbaImage};
use irekae_core::{slot_cell, TileId};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("image is {width}x{height}, too small for a {grid_size}x{grid_size} grid")]
    TooSmall {
        width: u32,
        height: u32,
        grid_size: u32,
    },
}

/// Source image pre-cut for one grid size. Every tile is `w/n` by `h/n`
/// pixels; remainder pixels from non-divisible dimensions fall off the
/// right and bottom edges.
pub struct SourceImage {
    pixels: RgbaImage,
    grid_size: u32,
    tile_width: u32,
    tile_height: u32,
}

impl SourceImage {
    pub fn load(path: &Path, grid_size: u32) -> Result<Self, ExportError> {
        let decoded = image::open(path).map_err(|err| ExportError::Decode(err.to_string()))?;
        Self::from_pixels(decoded.to_rgba8(), grid_size)
    }

    pub fn from_pixels(pixels: RgbaImage, grid_size: u32) -> Result<Self, ExportError> {
        let (width, height) = pixels.dimensions();
        if width < grid_size || height < grid_size {
            return Err(ExportError::TooSmall {
                width,
                height,
                grid_size,
            });
        }
        Ok(Self {
            grid_size,
            tile_width: width / grid_size,
            tile_height: height / grid_size,
            pixels,
        })
    }

    /// Composites the current arrangement: slot i of the output receives
    /// the crop belonging to `order[i]`, both sides using the same
    /// row-major cell convention as the engine.
    pub fn compose(&self, order: &[TileId]) -> RgbaImage {
        let mut output = RgbaImage::new(
            self.tile_width * self.grid_size,
            self.tile_height * self.grid_size,
        );
        for (slot, tile) in order.iter().enumerate() {
            let crop = imageops::crop_imm(
                &self.pixels,
                tile.col * self.tile_width,
                tile.row * self.tile_height,
                self.tile_width,
                self.tile_height,
            )
            .to_image();
            let (dest_row, dest_col) = slot_cell(slot, self.grid_size);
            imageops::replace(
                &mut output,
                &crop,
                (dest_col * self.tile_width) as i64,
                (dest_row * self.tile_height) as i64,
            );
        }
        output
    }

    pub fn export(&self, order: &[TileId], path: &Path) -> Result<(), ExportError> {
        self.compose(order)
            .save(path)
            .map_err(|err| ExportError::Encode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use irekae_core::solved_order;

    use super::*;

    /// 4x4 source, grid 2: each tile block gets its own red level.
    fn blocky_source() -> SourceImage {
        let mut pixels = RgbaImage::new(4, 4);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            let block = (y / 2) * 2 + x / 2;
            *pixel = Rgba([block as u8 * 10, 0, 0, 255]);
        }
        SourceImage::from_pixels(pixels, 2).expect("source image")
    }

    #[test]
    fn solved_order_reproduces_the_source() {
        let source = blocky_source();
        let output = source.compose(&solved_order(2));
        assert_eq!(output.dimensions(), (4, 4));
        assert_eq!(output.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(output.get_pixel(3, 0), &Rgba([10, 0, 0, 255]));
        assert_eq!(output.get_pixel(0, 3), &Rgba([20, 0, 0, 255]));
        assert_eq!(output.get_pixel(3, 3), &Rgba([30, 0, 0, 255]));
    }

    #[test]
    fn swapped_corners_trade_their_pixels() {
        let source = blocky_source();
        let mut order = solved_order(2);
        order.swap(0, 3);
        let output = source.compose(&order);
        assert_eq!(output.get_pixel(0, 0), &Rgba([30, 0, 0, 255]));
        assert_eq!(output.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(output.get_pixel(3, 0), &Rgba([10, 0, 0, 255]));
    }

    #[test]
    fn remainder_pixels_are_dropped() {
        let pixels = RgbaImage::new(7, 5);
        let source = SourceImage::from_pixels(pixels, 3).expect("source image");
        let output = source.compose(&solved_order(3));
        assert_eq!(output.dimensions(), (6, 3));
    }

    #[test]
    fn undersized_images_are_rejected() {
        let pixels = RgbaImage::new(2, 8);
        let result = SourceImage::from_pixels(pixels, 3);
        assert!(matches!(
            result,
            Err(ExportError::TooSmall { width: 2, height: 8, grid_size: 3 })
        ));
    }
}
