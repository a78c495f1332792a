pub(crate) mod orange;
pub(crate) mod passthrough;

use clap::ValueEnum;
use serde::Deserialize;

use crate::color::RgbColor;

pub trait ColorPolicy {
    fn correct(&self, color: RgbColor) -> RgbColor;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Keep bright colors in the orange range
    Orange,
    /// Send the sampled color as is
    Passthrough,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn ColorPolicy + Send> {
        match self {
            PolicyKind::Orange => Box::new(orange::OrangeBias::new()),
            PolicyKind::Passthrough => Box::new(passthrough::Passthrough),
        }
    }
}
