use super::types::{AudioConfig, ClockConfig, Config, FormulaConfig};
use crate::{formula::namespace::MACROS, log_warn, render::Macros};

pub trait Validate {
    fn validate(&mut self);
}

impl Validate for AudioConfig {
    fn validate(&mut self) {
        if !(8000..=192_000).contains(&self.sample_rate) {
            log_warn!("Invalid sample_rate: {}. Using default: 44100", self.sample_rate);
            self.sample_rate = 44100;
        }

        if self.block_size == 0 || self.block_size > 8192 {
            log_warn!("Invalid block_size: {}. Using default: 512", self.block_size);
            self.block_size = 512;
        }

        if self.channels == 0 || self.channels > 8 {
            log_warn!("Invalid channels: {}. Using default: 2", self.channels);
            self.channels = 2;
        }
    }
}

impl Validate for ClockConfig {
    fn validate(&mut self) {
        if self.base_rate == 0 {
            log_warn!("Invalid base_rate: 0. Using default: 8000");
            self.base_rate = 8000;
        }

        if !self.tempo.is_finite() || self.tempo <= 0.0 || self.tempo > 999.0 {
            log_warn!("Invalid tempo: {}. Using default: 120", self.tempo);
            self.tempo = 120.0;
        }

        if self.ticks_per_beat == 0 {
            log_warn!("Invalid ticks_per_beat: 0. Using default: 256");
            self.ticks_per_beat = 256;
        }
    }
}

impl Validate for Macros {
    fn validate(&mut self) {
        for name in MACROS {
            if let Some(value) = self.get(name) {
                if !(0..=255).contains(&value) {
                    log_warn!("Invalid macro {name}: {value}. Using default: 0");
                    self.set(name, 0);
                }
            }
        }
    }
}

impl Validate for FormulaConfig {
    fn validate(&mut self) {
        if self.text.trim().is_empty() {
            log_warn!("Empty formula. Using default: t");
            self.text = "t".to_string();
        }
    }
}

impl Validate for Config {
    fn validate(&mut self) {
        self.audio.validate();
        self.clock.validate();
        self.macros.validate();
        self.formula.validate();
    }
}
