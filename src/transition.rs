use palette::Srgb;

use crate::color::RgbColor;

/// What the delivery loop remembers between cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionState {
    last_color: Option<RgbColor>,
    fading: bool,
}

impl TransitionState {
    pub fn new() -> TransitionState {
        TransitionState::default()
    }

    pub fn last_color(&self) -> Option<RgbColor> {
        self.last_color
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    pub fn begin(&mut self) {
        self.fading = true;
    }

    pub fn complete(&mut self, target: RgbColor) {
        self.last_color = Some(target);
        self.fading = false;
    }

    /// Leaves the last color as it was.
    pub fn abort(&mut self) {
        self.fading = false;
    }
}

/// Linear interpolation from `previous` to `target`, both ends included.
///
/// With no previous color, or when nothing changes, only the target is
/// returned. A step count of zero behaves like one.
pub fn fade_steps(previous: Option<RgbColor>, target: RgbColor, steps: u8) -> Vec<RgbColor> {
    let previous = match previous {
        Some(previous) if previous != target => previous,
        _ => return vec![target],
    };

    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            Srgb::new(
                lerp(previous.red, target.red, i, steps),
                lerp(previous.green, target.green, i, steps),
                lerp(previous.blue, target.blue, i, steps),
            )
        })
        .collect()
}

// Integer division truncates toward zero, so the result stays between from and to.
fn lerp(from: u8, to: u8, step: u8, steps: u8) -> u8 {
    let from = i32::from(from);
    let value = from + (i32::from(to) - from) * i32::from(step) / i32::from(steps);
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}
