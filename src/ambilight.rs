use std::time::Duration;

use crate::capture::PixelSource;
use crate::color::RgbColor;
use crate::correction::ColorPolicy;
use crate::devicelink::DeviceLink;
use crate::error::Error;
use crate::intervaltimer::IntervalTimer;
use crate::lightcommand::{self, LightCommand};
use crate::sampler;
use crate::stopsignal::StopSignal;
use crate::transition::{self, TransitionState};

#[derive(Clone, Debug, PartialEq)]
pub struct AmbilightOptions {
    pub display: usize,
    pub interval: Duration,
    pub fade_steps: u8,
    pub white: u8,
    pub brightness: u8,
}

/// Capture, sample, correct, fade, send. Once per interval.
pub struct Ambilight<S: PixelSource, L: DeviceLink> {
    source: S,
    link: L,
    policy: Box<dyn ColorPolicy + Send>,
    options: AmbilightOptions,
    state: TransitionState,
    stop: StopSignal,
    timer: IntervalTimer,
}

impl<S: PixelSource, L: DeviceLink> Ambilight<S, L> {
    pub fn new(
        source: S,
        link: L,
        policy: Box<dyn ColorPolicy + Send>,
        options: AmbilightOptions,
        stop: StopSignal,
    ) -> Ambilight<S, L> {
        let timer = IntervalTimer::new(options.interval, true);

        Ambilight {
            source,
            link,
            policy,
            options,
            state: TransitionState::new(),
            stop,
            timer,
        }
    }

    /// Runs until stopped or the link is lost.
    pub fn run(&mut self) -> Result<(), Error> {
        while !self.stop.is_raised() {
            match self.update() {
                Ok(()) => {}
                Err(err) if err.is_fatal() => {
                    if self.state.is_fading() {
                        log::warn!("Fade interrupted");
                    }
                    self.state.abort();
                    return Err(err);
                }
                Err(err) => log::warn!("Skipping update: {err}"),
            }

            if self.timer.sleep_until_next_tick(&self.stop) {
                break;
            }
        }

        log::info!("Stopped");
        Ok(())
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    fn update(&mut self) -> Result<(), Error> {
        let frame = self.source.capture(self.options.display)?;
        let sampled = sampler::average_color(&frame)?;
        let corrected = self.policy.correct(sampled);
        self.fade_to(corrected)
    }

    fn fade_to(&mut self, target: RgbColor) -> Result<(), Error> {
        let steps = transition::fade_steps(self.state.last_color(), target, self.options.fade_steps);

        let paused = steps.len() > 1;

        self.state.begin();
        for (i, color) in steps.into_iter().enumerate() {
            if i > 0 && self.stop.sleep(self.timer.interval()) {
                self.state.abort();
                return Ok(());
            }
            self.send(color)?;
        }
        self.state.complete(target);

        // The pauses between steps already spaced the writes out.
        if paused {
            self.timer.restart();
        }

        Ok(())
    }

    /// Retries a failed write once, then drops the step.
    fn send(&mut self, color: RgbColor) -> Result<(), Error> {
        let command = LightCommand::new(color, self.options.white, self.options.brightness);
        let frame = command.encode();
        debug_assert_eq!(LightCommand::parse(&frame), Ok(command));

        for attempt in 1..=2 {
            match self.link.write(&frame) {
                Ok(()) => {
                    log::debug!(
                        "Color updated to RGB({}, {}, {}) [{}]",
                        color.red,
                        color.green,
                        color.blue,
                        lightcommand::to_hex(&frame)
                    );
                    return Ok(());
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => log::warn!("{err} (attempt {attempt})"),
            }
        }

        log::warn!(
            "Dropped RGB({}, {}, {})",
            color.red,
            color.green,
            color.blue
        );
        Ok(())
    }
}
