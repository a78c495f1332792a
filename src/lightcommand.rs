use palette::Srgb;

use crate::color::RgbColor;
use crate::error::Error;

const PREFIX: [u8; 2] = [0x5A, 0x00];
const MODE_RGB: u8 = 0x01;
const SPEED: u8 = 0x00;
const TERMINATOR: u8 = 0xA5;

pub const FRAME_LEN: usize = 10;

/// A single "set color" command for the light controller.
///
/// Wire layout: `5A 00 | 01 | R G B | W | brightness | speed | A5`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightCommand {
    pub color: RgbColor,
    pub white: u8,
    /// Nominally 0-100, not clamped.
    pub brightness: u8,
}

impl LightCommand {
    pub fn new(color: RgbColor, white: u8, brightness: u8) -> LightCommand {
        LightCommand {
            color,
            white,
            brightness,
        }
    }

    pub fn encode(&self) -> [u8; FRAME_LEN] {
        [
            PREFIX[0],
            PREFIX[1],
            MODE_RGB,
            self.color.red,
            self.color.green,
            self.color.blue,
            self.white,
            self.brightness,
            SPEED,
            TERMINATOR,
        ]
    }

    pub fn parse(frame: &[u8]) -> Result<LightCommand, Error> {
        if frame.len() != FRAME_LEN {
            return Err(Error::Encoding(format!(
                "expected {} bytes, got {}",
                FRAME_LEN,
                frame.len()
            )));
        }
        if frame[..2] != PREFIX {
            return Err(Error::Encoding(format!(
                "bad prefix {:02X}{:02X}",
                frame[0], frame[1]
            )));
        }
        if frame[2] != MODE_RGB {
            return Err(Error::Encoding(format!("unsupported mode {:02X}", frame[2])));
        }
        if frame[FRAME_LEN - 1] != TERMINATOR {
            return Err(Error::Encoding(format!(
                "bad terminator {:02X}",
                frame[FRAME_LEN - 1]
            )));
        }

        Ok(LightCommand {
            color: Srgb::new(frame[3], frame[4], frame[5]),
            white: frame[6],
            brightness: frame[7],
        })
    }
}

/// Formats a frame as upper case hex for logging.
pub fn to_hex(frame: &[u8]) -> String {
    frame.iter().map(|b| format!("{b:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let frame = LightCommand::new(Srgb::new(0x11, 0x22, 0x33), 0x44, 50).encode();
        assert_eq!(
            frame,
            [0x5A, 0x00, 0x01, 0x11, 0x22, 0x33, 0x44, 0x32, 0x00, 0xA5]
        );
        assert_eq!(to_hex(&frame), "5A0001112233443200A5");
    }

    #[test]
    fn parse_recovers_fields() {
        let cmd = LightCommand::new(Srgb::new(255, 0, 128), 7, 100);
        let parsed = LightCommand::parse(&cmd.encode()).unwrap();
        assert_eq!(parsed, cmd);
    }

    #[test]
    fn brightness_is_not_clamped() {
        let frame = LightCommand::new(Srgb::new(0, 0, 0), 0, 200).encode();
        assert_eq!(frame[7], 200);
    }

    #[test]
    fn parse_rejects_malformed_frames() {
        let good = LightCommand::new(Srgb::new(1, 2, 3), 0, 50).encode();

        assert!(matches!(
            LightCommand::parse(&good[..9]),
            Err(Error::Encoding(_))
        ));

        let mut bad_prefix = good;
        bad_prefix[1] = 0x01;
        assert!(LightCommand::parse(&bad_prefix).is_err());

        let mut bad_mode = good;
        bad_mode[2] = 0x02;
        assert!(LightCommand::parse(&bad_mode).is_err());

        let mut bad_end = good;
        bad_end[9] = 0x00;
        assert!(LightCommand::parse(&bad_end).is_err());
    }
}
