//! The symbolic unit of the encoding pipeline: a `(frequency, duration)`
//! pair. Segments are produced lazily by `preamble`, `body`, and
//! `fskid`, and consumed lazily by `synth`.

/// A single tone or silence held for a fixed duration.
///
/// `freq_hz` is `None` for silence (still advances the synthesizer's
/// sample accumulator). No mode currently emits
/// silence, but the contract allows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub freq_hz: Option<f64>,
    pub duration_ms: f64,
}

impl Segment {
    pub fn tone(freq_hz: f64, duration_ms: f64) -> Self {
        debug_assert!(
            (tones::VIS_BIT1..=tones::WHITE).contains(&freq_hz),
            "tone frequency {freq_hz} Hz outside the [1100, 2300] contract"
        );
        debug_assert!(duration_ms > 0.0, "segment duration must be positive");
        Self {
            freq_hz: Some(freq_hz),
            duration_ms,
        }
    }

    pub fn silence(duration_ms: f64) -> Self {
        Self {
            freq_hz: None,
            duration_ms,
        }
    }
}

/// Fixed control tones used by the VIS header, sync pulses, and FSKID
/// trailer.
pub mod tones {
    /// VIS bit = 1, and the pre-leader tone of an FSKID bit = 1.
    pub const VIS_BIT1: f64 = 1100.0;
    /// Horizontal sync / VIS break / VIS stop bit.
    pub const SYNC: f64 = 1200.0;
    /// VIS bit = 0.
    pub const VIS_BIT0: f64 = 1300.0;
    /// Black level, and the Robot 36 Cr-separator tone.
    pub const BLACK: f64 = 1500.0;
    /// VIS leader / start bit, and FSKID bit = 1.
    pub const VIS_START: f64 = 1900.0;
    /// FSKID bit = 0.
    pub const FSKID_BIT0: f64 = 2100.0;
    /// White level, and the Robot 36 Cb-separator tone.
    pub const WHITE: f64 = 2300.0;
}

/// Maps an 8-bit pixel value to its SSTV tone frequency.
///
/// `byte_to_freq(0) = 1500`, `byte_to_freq(255) = 2300`, linear in
/// between: `1500 + 800 * v / 255`.
pub fn byte_to_freq(v: u8) -> f64 {
    tones::BLACK + 800.0 * v as f64 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn byte_to_freq_endpoints() {
        assert_abs_diff_eq!(byte_to_freq(0), 1500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(byte_to_freq(255), 2300.0, epsilon = 1e-9);
    }

    #[test]
    fn byte_to_freq_midpoint() {
        assert_abs_diff_eq!(byte_to_freq(128), 1901.568_627_45, epsilon = 0.1);
    }
}
