use serde::{Deserialize, Serialize};

use crate::render::Macros;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub macros: Macros,

    #[serde(default)]
    pub formula: FormulaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default = "default_channels")]
    pub channels: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClockConfig {
    /// Rate at which `t` counts.
    #[serde(default = "default_base_rate")]
    pub base_rate: u32,

    #[serde(default = "default_tempo")]
    pub tempo: f64,

    #[serde(default = "default_ticks_per_beat")]
    pub ticks_per_beat: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormulaConfig {
    #[serde(default = "default_formula_text")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    #[serde(default = "default_log_mode")]
    pub mode: LogMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    Standalone,
    File,
    Silent,
}

pub(super) fn default_sample_rate() -> u32 {
    44100
}

pub(super) fn default_block_size() -> usize {
    512
}

pub(super) fn default_channels() -> u16 {
    2
}

pub(super) fn default_base_rate() -> u32 {
    crate::render::DEFAULT_BASE_RATE
}

pub(super) fn default_tempo() -> f64 {
    120.0
}

pub(super) fn default_ticks_per_beat() -> u32 {
    256
}

pub(super) fn default_formula_text() -> String {
    "t * ((t >> 12 | t >> 8) & 63 & t >> 4)".to_string()
}

pub(super) fn default_log_mode() -> LogMode {
    LogMode::Standalone
}
