//! VOX tone, VIS header, and the FSKID trailer's sibling framing lives
//! in `fskid.rs`.

use crate::segment::{tones, Segment};

const VOX_PATTERN: [(f64, f64); 8] = [
    (tones::VIS_START, 100.0),
    (tones::BLACK, 100.0),
    (tones::VIS_START, 100.0),
    (tones::BLACK, 100.0),
    (tones::WHITE, 100.0),
    (tones::BLACK, 100.0),
    (tones::WHITE, 100.0),
    (tones::BLACK, 100.0),
];

fn vox_segments() -> impl Iterator<Item = Segment> {
    VOX_PATTERN.into_iter().map(|(f, d)| Segment::tone(f, d))
}

fn vis_leader_segments() -> impl Iterator<Item = Segment> {
    [
        Segment::tone(tones::VIS_START, 300.0),
        Segment::tone(tones::SYNC, 10.0),
        Segment::tone(tones::VIS_START, 300.0),
        Segment::tone(tones::SYNC, 30.0),
    ]
    .into_iter()
}

/// The 7 VIS data bits, LSB-first, 30ms each.
fn vis_code_bits(vis_code: u8) -> impl Iterator<Item = Segment> {
    (0..7).map(move |bit| {
        let one = (vis_code >> bit) & 1 == 1;
        Segment::tone(if one { tones::VIS_BIT1 } else { tones::VIS_BIT0 }, 30.0)
    })
}

fn vis_parity_bit(vis_code: u8) -> Segment {
    let ones = (0..7).filter(|bit| (vis_code >> bit) & 1 == 1).count();
    let odd = ones % 2 == 1;
    Segment::tone(if odd { tones::VIS_BIT1 } else { tones::VIS_BIT0 }, 30.0)
}

fn vis_stop_bit() -> Segment {
    Segment::tone(tones::SYNC, 30.0)
}

/// The full preamble: optional VOX, then the VIS header/code/parity/stop
/// bit, always present.
pub fn preamble_segments(vis_code: u8, vox_enabled: bool) -> impl Iterator<Item = Segment> {
    let vox = if vox_enabled {
        Some(vox_segments())
    } else {
        None
    };

    vox.into_iter()
        .flatten()
        .chain(vis_leader_segments())
        .chain(vis_code_bits(vis_code))
        .chain(std::iter::once(vis_parity_bit(vis_code)))
        .chain(std::iter::once(vis_stop_bit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vox_off_starts_with_vis_leader() {
        let segs: Vec<Segment> = preamble_segments(0x3C, false).collect();
        assert_eq!(segs[0], Segment::tone(tones::VIS_START, 300.0));
    }

    #[test]
    fn vox_on_starts_with_fixed_pattern() {
        let segs: Vec<Segment> = preamble_segments(0x3C, true).collect();
        assert_eq!(segs[0], Segment::tone(1900.0, 100.0));
        for seg in &segs[0..8] {
            assert!(seg.freq_hz == Some(1900.0) || seg.freq_hz == Some(1500.0) || seg.freq_hz == Some(2300.0));
        }
    }

    #[test]
    fn vis_bits_are_lsb_first_and_parity_matches_popcount() {
        // vis_code = 0b0101010 -> bits emitted LSB-first: 0,1,0,1,0,1,0
        let vis_code = 0b0101010u8;
        let segs: Vec<Segment> = preamble_segments(vis_code, false).collect();
        let bits = &segs[4..11]; // after the 4 leader segments
        let expected = [0, 1, 0, 1, 0, 1, 0];
        for (seg, &bit) in bits.iter().zip(expected.iter()) {
            let expected_freq = if bit == 1 { tones::VIS_BIT1 } else { tones::VIS_BIT0 };
            assert_eq!(seg.freq_hz, Some(expected_freq));
        }
        let ones = expected.iter().filter(|&&b| b == 1).count();
        let parity = &segs[11];
        let expected_parity_freq = if ones % 2 == 1 { tones::VIS_BIT1 } else { tones::VIS_BIT0 };
        assert_eq!(parity.freq_hz, Some(expected_parity_freq));
        assert_eq!(segs[12], Segment::tone(tones::SYNC, 30.0));
    }

    #[test]
    fn every_preamble_tone_is_in_contract_range() {
        for seg in preamble_segments(0x08, true) {
            let f = seg.freq_hz.expect("preamble never emits silence");
            assert!((1100.0..=2300.0).contains(&f));
            assert!(seg.duration_ms > 0.0);
        }
    }
}
