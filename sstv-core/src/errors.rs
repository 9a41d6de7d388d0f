//! Core error type.
//!
//! The encoding pipeline is a pure function of its inputs and cannot
//! fail mid-stream once preconditions are satisfied. Sample rate and
//! image dimensions are validated once, at `Encoder::new`; bit depth is
//! validated wherever a raw numeric value enters the system (see
//! `config::BitDepth::from_bits`).

use thiserror::Error;

/// The three failure modes the core itself can raise. Everything else
/// (image decoding, file I/O) is a collaborator's responsibility.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SstvError {
    #[error("unsupported bit depth: {bit_depth} (must be 8 or 16)")]
    UnsupportedBitDepth { bit_depth: u8 },

    #[error("invalid sample rate: {rate} Hz (must be > 0)")]
    InvalidSampleRate { rate: i64 },

    #[error(
        "image dimensions {actual_width}x{actual_height} do not match mode's native \
         {expected_width}x{expected_height}"
    )]
    ImageDimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

pub type Result<T> = std::result::Result<T, SstvError>;
