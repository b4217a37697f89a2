//! User configuration, stored as TOML.

mod defaults;
mod loader;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use types::{AudioConfig, ClockConfig, Config, FormulaConfig, LogMode, LoggingConfig};
pub use validation::Validate;

use crate::render::BlockClock;

impl Config {
    /// A clock at sample zero using the configured rates.
    pub fn block_clock(&self) -> BlockClock {
        BlockClock {
            sample_rate: self.audio.sample_rate,
            base_rate: self.clock.base_rate,
            tempo: self.clock.tempo,
            ticks_per_beat: self.clock.ticks_per_beat,
            elapsed: 0,
        }
    }
}
