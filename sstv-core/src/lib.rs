//! SSTV waveform encoder core
//!
//! This crate converts a raster image already normalized to a mode's
//! native resolution into the symbolic `(frequency, duration)` segment
//! stream the Slow-Scan Television analog transmission standard defines,
//! then synthesizes that stream into dithered PCM samples. Image
//! decoding, resizing, grayscale conversion, and WAV container framing
//! are left to collaborators (see `sstv-cli`).

pub mod config;
pub mod encoder;
pub mod errors;
pub mod fskid;
pub mod image;
pub mod logging;
pub mod modes;
pub mod preamble;
pub mod segment;
pub mod synth;

mod body;

pub use config::{BitDepth, EncoderConfig};
pub use encoder::Encoder;
pub use errors::SstvError;
pub use image::{LumaImage, PixelField, RgbImage};
pub use modes::{Family, Mode, ModeDescriptor};
pub use segment::{byte_to_freq, tones, Segment};
