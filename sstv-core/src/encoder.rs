//! High-level encoder: descriptor + image + config → segment stream →
//! PCM sample stream.

use crate::body::body_segments;
use crate::config::EncoderConfig;
use crate::errors::SstvError;
use crate::fskid::fskid_segments;
use crate::image::PixelField;
use crate::logging::{LogCollector, LogEntry, LogLevel};
use crate::modes::{Family, Mode, ModeDescriptor};
use crate::preamble::preamble_segments;
use crate::segment::Segment;
use crate::synth::SampleStream;

/// An immutable per-invocation encoder: the descriptor and image never
/// change after construction.
pub struct Encoder<'a> {
    descriptor: ModeDescriptor,
    image: &'a PixelField,
    config: EncoderConfig,
    diagnostics: LogCollector,
}

impl<'a> Encoder<'a> {
    /// Validates bit depth, sample rate, and image dimensions once, at
    /// construction. Family/pixel-field agreement
    /// (e.g. a grayscale mode needs a `PixelField::Luma`) is a
    /// precondition of the caller's choice of `mode`, not one of the
    /// three named error kinds.
    pub fn new(mode: Mode, image: &'a PixelField, config: EncoderConfig) -> Result<Self, SstvError> {
        let descriptor = mode.descriptor();

        if config.sample_rate == 0 {
            return Err(SstvError::InvalidSampleRate { rate: 0 });
        }

        if image.width() != descriptor.width || image.height() != descriptor.height {
            return Err(SstvError::ImageDimensionMismatch {
                expected_width: descriptor.width,
                expected_height: descriptor.height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }

        let mut diagnostics = LogCollector::default();
        if let Some(message) = pd_drop_diagnostic(&descriptor) {
            diagnostics.log(LogLevel::Warn, message);
        }

        Ok(Self { descriptor, image, config, diagnostics })
    }

    pub fn descriptor(&self) -> ModeDescriptor {
        self.descriptor
    }

    /// Non-fatal notes recorded at construction (e.g. a dropped trailing
    /// odd row for a PD-family image). Diagnostic-only; a caller is free
    /// to ignore this entirely.
    pub fn diagnostics(&self) -> &[LogEntry] {
        self.diagnostics.entries()
    }

    /// The lazy `(frequency, duration)` segment stream: VOX preamble
    /// (optional), VIS header, per-line body, FSKID trailer (optional).
    /// Nothing beyond the in-flight segment is ever materialized.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        // `fskid_segments` borrows its slice; the trailer is collected
        // into an owned `Vec<Segment>` up front so the chained iterator
        // doesn't borrow from a temporary payload buffer.
        let fskid: Vec<Segment> = fskid_segments(self.config.fskid_payload()).collect();
        preamble_segments(self.descriptor.vis_code, self.config.vox_enabled)
            .chain(body_segments(&self.descriptor, self.image))
            .chain(fskid)
    }

    /// Synthesizes the segment stream into quantized PCM samples at the
    /// configured sample rate and bit depth.
    pub fn samples(&self) -> Result<SampleStream<impl Iterator<Item = Segment> + '_>, SstvError> {
        SampleStream::new(self.segments(), self.config.sample_rate, self.config.bit_depth, self.config.dither_seed)
    }
}

/// `pd_body`'s paired-row walk drops a trailing unpaired row when a
/// PD-family descriptor has odd height. Every built-in PD mode has even
/// height, so this never fires against `Mode::descriptor`; it exists for
/// whoever extends the table next.
fn pd_drop_diagnostic(descriptor: &ModeDescriptor) -> Option<String> {
    if matches!(descriptor.family, Family::Pd { .. }) && descriptor.height % 2 != 0 {
        Some(format!("PD family mode has odd height {}: trailing row is dropped", descriptor.height))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::LumaImage;

    #[test]
    fn rejects_dimension_mismatch() {
        let image = PixelField::Luma(LumaImage::new(10, 10, vec![0.0; 100]));
        let err = Encoder::new(Mode::Robot8Bw, &image, EncoderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SstvError::ImageDimensionMismatch {
                expected_width: 160,
                expected_height: 120,
                actual_width: 10,
                actual_height: 10,
            }
        );
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let image = PixelField::Luma(LumaImage::new(160, 120, vec![0.0; 160 * 120]));
        let mut config = EncoderConfig::default();
        config.sample_rate = 0;
        let err = Encoder::new(Mode::Robot8Bw, &image, config).unwrap_err();
        assert_eq!(err, SstvError::InvalidSampleRate { rate: 0 });
    }

    #[test]
    fn first_segment_after_preamble_is_mode_sync() {
        let image = PixelField::Luma(LumaImage::new(160, 120, vec![0.5; 160 * 120]));
        let encoder = Encoder::new(Mode::Robot8Bw, &image, EncoderConfig::default()).unwrap();
        // 4 leader segments + 7 vis bits + parity + stop = 13 preamble segments.
        let segs: Vec<Segment> = encoder.segments().take(14).collect();
        assert_eq!(segs[13], Segment::tone(1200.0, 7.0));
    }

    #[test]
    fn fskid_appends_after_body() {
        let image = PixelField::Luma(LumaImage::new(160, 120, vec![0.0; 160 * 120]));
        let mut config = EncoderConfig::default();
        config.add_fskid_text("A");
        let encoder = Encoder::new(Mode::Robot8Bw, &image, config).unwrap();
        let segs: Vec<Segment> = encoder.segments().collect();
        // 4 framed bytes * 6 bits = 24 trailing FSKID segments.
        let tail = &segs[segs.len() - 24..];
        for seg in tail {
            assert!(seg.freq_hz == Some(1900.0) || seg.freq_hz == Some(2100.0));
            assert_eq!(seg.duration_ms, 22.0);
        }
    }

    #[test]
    fn sample_stream_is_non_empty_and_reproducible() {
        let image = PixelField::Luma(LumaImage::new(160, 120, vec![0.5; 160 * 120]));
        let encoder = Encoder::new(Mode::Robot8Bw, &image, EncoderConfig::default()).unwrap();
        let a: Vec<i32> = encoder.samples().unwrap().collect();
        let b: Vec<i32> = encoder.samples().unwrap().collect();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn no_builtin_pd_mode_triggers_the_drop_diagnostic() {
        let image = PixelField::Luma(LumaImage::new(160, 120, vec![0.5; 160 * 120]));
        let encoder = Encoder::new(Mode::Robot8Bw, &image, EncoderConfig::default()).unwrap();
        assert!(encoder.diagnostics().is_empty());
        for mode in Mode::ALL {
            assert!(pd_drop_diagnostic(&mode.descriptor()).is_none());
        }
    }

    #[test]
    fn odd_height_pd_descriptor_is_flagged() {
        let descriptor = ModeDescriptor {
            vis_code: 0x5F,
            width: 640,
            height: 497,
            sync_ms: 20.0,
            family: Family::Pd { porch_ms: 2.08, pixel_ms: 0.190 },
        };
        assert!(pd_drop_diagnostic(&descriptor).is_some());
    }
}
