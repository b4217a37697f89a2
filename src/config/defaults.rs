use super::types::*;

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            block_size: default_block_size(),
            channels: default_channels(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            tempo: default_tempo(),
            ticks_per_beat: default_ticks_per_beat(),
        }
    }
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            text: default_formula_text(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            mode: default_log_mode(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            clock: ClockConfig::default(),
            macros: Default::default(),
            formula: FormulaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
