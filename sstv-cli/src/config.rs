//! CLI-specific configuration for TOML-based configuration.

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sstv_core::{BitDepth, EncoderConfig};

/// Complete CLI configuration bundle, loadable from a TOML file and
/// overridable by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub input_image: Option<PathBuf>,
    #[serde(default)]
    pub wav_output: Option<PathBuf>,

    #[serde(default)]
    pub encoder: EncoderSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The subset of `sstv_core::EncoderConfig` a user can set from TOML or
/// the command line; the FSKID payload is built from `fskid_text`
/// rather than accepted as raw bytes. `bits` is the raw number a user
/// types (8 or 16); it is only validated into a `BitDepth` when building
/// the `EncoderConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSection {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_bits")]
    pub bits: u8,
    #[serde(default)]
    pub vox_enabled: bool,
    #[serde(default)]
    pub fskid_text: Option<String>,
    #[serde(default = "default_dither_seed")]
    pub dither_seed: u64,
}

fn default_sample_rate() -> u32 {
    48_000
}

fn default_bits() -> u8 {
    16
}

fn default_dither_seed() -> u64 {
    sstv_core::config::DEFAULT_DITHER_SEED
}

impl Default for EncoderSection {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            bits: default_bits(),
            vox_enabled: false,
            fskid_text: None,
            dither_seed: default_dither_seed(),
        }
    }
}

impl EncoderSection {
    pub fn to_encoder_config(&self) -> Result<EncoderConfig> {
        let bit_depth = BitDepth::from_bits(self.bits).wrap_err_with(|| format!("invalid bit depth: {}", self.bits))?;
        let mut config = EncoderConfig {
            sample_rate: self.sample_rate,
            bit_depth,
            vox_enabled: self.vox_enabled,
            dither_seed: self.dither_seed,
            ..EncoderConfig::default()
        };
        if let Some(text) = &self.fskid_text {
            config.add_fskid_text(text);
        }
        Ok(config)
    }
}

/// Logging output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_target() -> LogTarget {
    LogTarget::Stderr
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            target: default_log_target(),
            file_path: None,
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Logfmt,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mode: None,
            input_image: None,
            wav_output: None,
            encoder: EncoderSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads a configuration from a single TOML file; missing fields
    /// fall back to `Default`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&content).wrap_err("Failed to parse TOML configuration")?;
        Ok(config)
    }
}
