//! Phase-continuous sine synthesizer with dithered quantization.
//!
//! A single custom `Iterator<Item = i32>` owns the oscillator phase,
//! the fractional-sample accumulator, and the dither ring, pulling one
//! `Segment` at a time from the upstream stream. No segment beyond the
//! one in flight, and no more than the fixed 1024-slot dither ring, is
//! ever materialized.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::config::BitDepth;
use crate::errors::SstvError;
use crate::segment::Segment;

const DITHER_RING_LEN: usize = 1024;

/// Round-robin ring of precomputed uniform values in `(-0.5, 0.5)`.
#[derive(Debug, Clone)]
pub struct DitherRing {
    values: [f64; DITHER_RING_LEN],
    idx: usize,
}

impl DitherRing {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut values = [0.0; DITHER_RING_LEN];
        for v in values.iter_mut() {
            *v = rng.gen_range(-0.5..0.5);
        }
        Self { values, idx: 0 }
    }

    /// Consumes one slot, advancing the ring by exactly one position.
    pub fn next_value(&mut self) -> f64 {
        let v = self.values[self.idx];
        self.idx = (self.idx + 1) % DITHER_RING_LEN;
        v
    }

    pub fn len(&self) -> usize {
        DITHER_RING_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

struct ActiveSegment {
    omega: Option<f64>,
    theta_start: f64,
    remaining: u64,
    k: u64,
}

/// Streams quantized PCM samples from a lazy `Segment` source.
pub struct SampleStream<I: Iterator<Item = Segment>> {
    segments: I,
    sample_rate: f64,
    theta: f64,
    sample_acc: f64,
    current: Option<ActiveSegment>,
    dither: DitherRing,
    bit_depth: BitDepth,
}

impl<I: Iterator<Item = Segment>> SampleStream<I> {
    pub fn new(segments: I, sample_rate: u32, bit_depth: BitDepth, dither_seed: u64) -> Result<Self, SstvError> {
        if sample_rate == 0 {
            return Err(SstvError::InvalidSampleRate { rate: 0 });
        }
        Ok(Self {
            segments,
            sample_rate: sample_rate as f64,
            theta: 0.0,
            sample_acc: 0.0,
            current: None,
            dither: DitherRing::new(dither_seed),
            bit_depth,
        })
    }

    fn pull_segment(&mut self) -> Option<()> {
        loop {
            let seg = self.segments.next()?;
            self.sample_acc += self.sample_rate / 1000.0 * seg.duration_ms;
            let n = self.sample_acc.floor();
            self.sample_acc -= n;
            let remaining = n as u64;

            let omega = seg.freq_hz.map(|f| TAU * f / self.sample_rate);

            if remaining == 0 {
                // Zero samples from a sub-sample-period segment: no
                // phase advance, try the next segment.
                continue;
            }

            self.current = Some(ActiveSegment {
                omega,
                theta_start: self.theta,
                remaining,
                k: 0,
            });
            return Some(());
        }
    }

    fn quantize(&mut self, v: f64) -> i32 {
        let full_scale = self.bit_depth.full_scale() as f64;
        let bits = self.bit_depth.bits();
        // Dither amplitude is 1/2^bits of a ±0.5 uniform draw: ¼-LSB
        // TPDF, not the textbook ±0.5-LSB TPDF. Intentional, see
        // DESIGN.md's Open Question Decisions.
        let dither = self.dither.next_value() / (1u64 << bits) as f64;
        let q = (v * full_scale + dither).round() as i64;
        let min = -(full_scale as i64);
        let max = full_scale as i64 - 1;
        q.clamp(min, max) as i32
    }
}

impl<I: Iterator<Item = Segment>> Iterator for SampleStream<I> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.current.is_none() {
            self.pull_segment()?;
        }

        let active = self.current.as_mut().expect("segment just pulled");
        let value = match active.omega {
            Some(omega) => (active.k as f64 * omega + active.theta_start).sin(),
            None => 0.0,
        };
        active.k += 1;

        if active.k == active.remaining {
            let omega = active.omega.unwrap_or(0.0);
            let mut theta = active.theta_start + active.remaining as f64 * omega;
            theta %= TAU;
            self.theta = theta;
            self.current = None;
        }

        Some(self.quantize(value))
    }
}
