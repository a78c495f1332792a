use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config_file::FromConfigFile;
use serde::Deserialize;
use uuid::Uuid;

use crate::ambilight::AmbilightOptions;
use crate::correction::PolicyKind;
use crate::devicelink::LinkOptions;

#[derive(Parser, Debug, Default)]
#[command(about = "Mirror the average screen color onto a BLE light")]
pub struct Cli {
    /// Config file, format picked by extension (e.g. .toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Advertised name of the light
    #[arg(short = 'n', long, value_name = "NAME")]
    pub device_name: Option<String>,

    /// UUID of the characteristic color commands are written to
    #[arg(long, value_name = "UUID")]
    pub characteristic: Option<Uuid>,

    /// Index of the display to sample
    #[arg(short, long)]
    pub display: Option<usize>,

    /// Time between updates in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Number of steps to fade between two colors
    #[arg(short, long)]
    pub fade_steps: Option<u8>,

    /// Brightness byte sent with every color, nominally 0-100
    #[arg(short, long)]
    pub brightness: Option<u8>,

    /// White channel byte sent with every color
    #[arg(short, long)]
    pub white: Option<u8>,

    /// Color correction applied to the sampled color
    #[arg(short, long, value_enum)]
    pub policy: Option<PolicyKind>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub device_name: String,
    pub characteristic: Uuid,
    pub display: usize,
    pub interval_ms: u64,
    pub fade_steps: u8,
    pub brightness: u8,
    pub white: u8,
    pub policy: PolicyKind,
    pub write_timeout_ms: u64,
    pub scan_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device_name: "KS03~8a0035".to_string(),
            characteristic: Uuid::from_u128(0x0000fff3_0000_1000_8000_00805f9b34fb),
            display: 0,
            interval_ms: 150,
            fade_steps: 2,
            brightness: 50,
            white: 0,
            policy: PolicyKind::Orange,
            write_timeout_ms: 500,
            scan_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Defaults, then the config file if one is given, then the command line.
    pub fn load(cli: &Cli) -> Result<Config, String> {
        let config = match cli.config.as_deref() {
            Some(path) => match Config::from_config_file(path) {
                Ok(config) => config,
                Err(err) => {
                    return Err(format!("Cannot read config {}: {}", path.display(), err));
                }
            },
            None => Config::default(),
        };

        Ok(config.merge(cli))
    }

    fn merge(mut self, cli: &Cli) -> Config {
        if let Some(device_name) = &cli.device_name {
            self.device_name = device_name.clone();
        }
        if let Some(characteristic) = cli.characteristic {
            self.characteristic = characteristic;
        }
        if let Some(display) = cli.display {
            self.display = display;
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(fade_steps) = cli.fade_steps {
            self.fade_steps = fade_steps;
        }
        if let Some(brightness) = cli.brightness {
            self.brightness = brightness;
        }
        if let Some(white) = cli.white {
            self.white = white;
        }
        if let Some(policy) = cli.policy {
            self.policy = policy;
        }
        self
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            device_name: self.device_name.clone(),
            characteristic: self.characteristic,
            scan_timeout: Duration::from_millis(self.scan_timeout_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
        }
    }

    pub fn ambilight_options(&self) -> AmbilightOptions {
        AmbilightOptions {
            display: self.display,
            interval: Duration::from_millis(self.interval_ms),
            fade_steps: self.fade_steps,
            white: self.white,
            brightness: self.brightness,
        }
    }
}
