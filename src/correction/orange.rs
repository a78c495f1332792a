use palette::Srgb;

use crate::color::RgbColor;
use crate::correction::ColorPolicy;

/// Heuristic that keeps bright colors from drifting into yellow or brown.
///
/// Not physically motivated: colors where any channel reaches `bright_limit`
/// are classified by their channel mean. Dark means are pushed to a deep
/// orange, bright means to a saturated orange, everything else is left alone.
pub struct OrangeBias {
    bright_limit: u8,
    brown_threshold: u8,
    yellow_threshold: u8,
    red: u8,
    min_green: u8,
    max_blue: u8,
}

impl OrangeBias {
    pub fn new() -> OrangeBias {
        OrangeBias {
            bright_limit: 200,
            brown_threshold: 100,
            yellow_threshold: 200,
            red: 255,
            min_green: 100,
            max_blue: 50,
        }
    }

    fn mean(color: RgbColor) -> u16 {
        (u16::from(color.red) + u16::from(color.green) + u16::from(color.blue)) / 3
    }
}

impl Default for OrangeBias {
    fn default() -> Self {
        OrangeBias::new()
    }
}

impl ColorPolicy for OrangeBias {
    fn correct(&self, color: RgbColor) -> RgbColor {
        if color.red < self.bright_limit
            && color.green < self.bright_limit
            && color.blue < self.bright_limit
        {
            return color;
        }

        let mean = OrangeBias::mean(color);
        if mean < u16::from(self.brown_threshold) {
            Srgb::new(
                self.red,
                color.green.max(self.min_green),
                color.blue.min(self.max_blue),
            )
        } else if mean > u16::from(self.yellow_threshold) {
            Srgb::new(self.red, color.green.max(self.min_green), 0)
        } else {
            color
        }
    }
}
