use xcap::Monitor;

use crate::error::Error;
use crate::sampler::PixelGrid;

pub trait PixelSource {
    fn capture(&mut self, display: usize) -> Result<PixelGrid, Error>;
}

/// Grabs whole displays through the platform's screenshot API.
#[derive(Default)]
pub struct ScreenCapture;

impl ScreenCapture {
    pub fn new() -> ScreenCapture {
        ScreenCapture
    }

    fn monitor(display: usize) -> Result<Monitor, Error> {
        let monitors = match Monitor::all() {
            Ok(monitors) => monitors,
            Err(err) => return Err(Error::CaptureFailure(format!("{err}"))),
        };
        let count = monitors.len();

        monitors.into_iter().nth(display).ok_or_else(|| {
            Error::CaptureFailure(format!("display {display} not present, found {count}"))
        })
    }
}

impl PixelSource for ScreenCapture {
    fn capture(&mut self, display: usize) -> Result<PixelGrid, Error> {
        let monitor = ScreenCapture::monitor(display)?;
        let image = match monitor.capture_image() {
            Ok(image) => image,
            Err(err) => return Err(Error::CaptureFailure(format!("{err}"))),
        };

        let (width, height) = (image.width() as usize, image.height() as usize);
        PixelGrid::from_rgba8(width, height, &image.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(source: impl PixelSource + 'static) -> Box<dyn PixelSource> {
        Box::new(source)
    }

    #[test]
    fn default_is_a_pixel_source() {
        let _source = boxed(ScreenCapture::default());
        let _source = boxed(ScreenCapture::new());
    }
}
