//! Per-invocation encoder configuration.

use serde::{Deserialize, Serialize};

use crate::errors::SstvError;
use crate::fskid::add_fskid_text;

/// PCM output bit depth. The core supports exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bits(&self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    /// `2^(bits - 1)`, the quantization full-scale amplitude.
    pub fn full_scale(&self) -> i64 {
        1i64 << (self.bits() - 1)
    }

    /// Converts a raw bit-depth number (as taken from a CLI flag or a
    /// config file field the user can type any integer into) into a
    /// `BitDepth`, the one place this numeric value is validated.
    pub fn from_bits(bits: u8) -> Result<Self, SstvError> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(SstvError::UnsupportedBitDepth { bit_depth: other }),
        }
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        BitDepth::Sixteen
    }
}

/// Default dither seed, used when the caller doesn't supply one, so a
/// bare `EncoderConfig::default()` still produces reproducible PCM.
pub const DEFAULT_DITHER_SEED: u64 = 0x5357_544F_5631;

/// Per-invocation encoder configuration: sample rate, bit depth, VOX
/// toggle, and the accumulated FSKID payload. The mode descriptor and
/// the image itself are passed separately to `Encoder::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
    pub vox_enabled: bool,
    pub dither_seed: u64,
    #[serde(default)]
    fskid_payload: Vec<u8>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            bit_depth: BitDepth::default(),
            vox_enabled: false,
            dither_seed: DEFAULT_DITHER_SEED,
            fskid_payload: Vec::new(),
        }
    }
}

impl EncoderConfig {
    /// Appends a framed FSKID text fragment. Safe to call more than
    /// once; each call keeps its own two-byte leader.
    pub fn add_fskid_text(&mut self, text: &str) {
        add_fskid_text(&mut self.fskid_payload, text);
    }

    pub fn fskid_payload(&self) -> &[u8] {
        &self.fskid_payload
    }

    pub fn has_fskid(&self) -> bool {
        !self.fskid_payload.is_empty()
    }
}
