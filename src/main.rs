pub(crate) mod ambilight;
pub(crate) mod capture;
pub(crate) mod color;
pub(crate) mod config;
pub(crate) mod correction;
pub(crate) mod devicelink;
pub(crate) mod error;
pub(crate) mod intervaltimer;
pub(crate) mod lightcommand;
pub(crate) mod sampler;
pub(crate) mod stopsignal;
pub(crate) mod transition;

use std::thread;

use anyhow::{anyhow, Context};
use clap::Parser;

use crate::ambilight::Ambilight;
use crate::capture::ScreenCapture;
use crate::config::{Cli, Config};
use crate::devicelink::BleLink;
use crate::stopsignal::StopSignal;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let config = Config::load(&args).map_err(|msg| anyhow!(msg))?;
    log::info!(
        "Sampling display {} every {}ms for {}",
        config.display,
        config.interval_ms,
        config.device_name
    );

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        log::info!("Shutting down");
        handler_stop.raise();
    })
    .context("Cannot install Ctrl-C handler")?;

    let link = BleLink::connect(&config.link_options())
        .with_context(|| format!("Cannot set up light {}", config.device_name))?;

    let policy = config.policy.build();
    let options = config.ambilight_options();
    let handle = thread::Builder::new()
        .name("Ambilight".to_string())
        .spawn(move || {
            let mut ambilight = Ambilight::new(ScreenCapture::new(), link, policy, options, stop);
            ambilight.run()
        })
        .context("Failed to create thread")?;

    match handle.join() {
        Ok(result) => result.context("Ambilight stopped"),
        Err(_) => Err(anyhow!("Ambilight thread panicked")),
    }
}
