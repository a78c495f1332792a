use palette::Srgb;

use crate::color::{Pixel, RgbColor};
use crate::error::Error;

/// A captured frame, pixels stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<PixelGrid, Error> {
        let expected = PixelGrid::area(width, height, 1)?;
        if pixels.len() != expected {
            return Err(Error::InvalidInput(format!(
                "{}x{} frame needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        Ok(PixelGrid {
            width,
            height,
            pixels,
        })
    }

    #[cfg(test)]
    pub fn uniform(width: usize, height: usize, pixel: Pixel) -> PixelGrid {
        PixelGrid {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    /// Builds a grid from tightly packed RGBA8 data, ignoring alpha.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Result<PixelGrid, Error> {
        let expected = PixelGrid::area(width, height, 4)?;
        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "{}x{} RGBA frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        let pixels = data
            .chunks_exact(4)
            .map(|px| crate::color::pixel_from_rgb8(px[0], px[1], px[2]))
            .collect();

        PixelGrid::new(width, height, pixels)
    }

    fn area(width: usize, height: usize, stride: usize) -> Result<usize, Error> {
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(stride))
            .ok_or_else(|| Error::InvalidInput(format!("{width}x{height} frame is too large")))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }
}

/// Averages all pixels of a frame, scaling each channel down to 8 bit first.
pub fn average_color(grid: &PixelGrid) -> Result<RgbColor, Error> {
    if grid.is_empty() {
        return Err(Error::InvalidInput(format!(
            "cannot average an empty {}x{} frame",
            grid.width(),
            grid.height()
        )));
    }

    let (mut total_r, mut total_g, mut total_b) = (0u64, 0u64, 0u64);
    for pixel in grid.pixels() {
        total_r += u64::from(pixel.red >> 8);
        total_g += u64::from(pixel.green >> 8);
        total_b += u64::from(pixel.blue >> 8);
    }

    let count = grid.pixels().len() as u64;
    Ok(Srgb::new(
        channel_mean(total_r, count),
        channel_mean(total_g, count),
        channel_mean(total_b, count),
    ))
}

// Each summand is at most 255, so the mean always fits.
fn channel_mean(total: u64, count: u64) -> u8 {
    u8::try_from(total / count).unwrap_or(u8::MAX)
}
