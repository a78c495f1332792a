use palette::Srgb;

/// An 8 bit per channel color as sent to the light.
pub type RgbColor = Srgb<u8>;

/// A captured pixel. Channels use the full 16 bit range.
pub type Pixel = Srgb<u16>;

/// Widens an 8 bit channel so that `>> 8` yields the original value again.
pub fn widen(value: u8) -> u16 {
    u16::from(value) * 257
}

pub fn pixel_from_rgb8(red: u8, green: u8, blue: u8) -> Pixel {
    Srgb::new(widen(red), widen(green), widen(blue))
}
