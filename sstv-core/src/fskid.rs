//! FSKID station-identifier trailer.

use crate::segment::{tones, Segment};

/// Appends one FSKID text fragment's framed bytes to `payload`:
/// `0x20, 0x2A`, then `c - 0x20` for each ASCII character of `text`,
/// terminated by `0x01`. Each call carries its own two-byte leader, so
/// multiple calls simply append more framed runs.
pub fn add_fskid_text(payload: &mut Vec<u8>, text: &str) {
    payload.push(0x20);
    payload.push(0x2A);
    for c in text.chars() {
        let c = c as u32;
        debug_assert!((0x20..=0x7F).contains(&c), "FSKID text must be ASCII");
        payload.push((c.saturating_sub(0x20)) as u8);
    }
    payload.push(0x01);
}

/// Each byte of `payload` contributes 6 bits, LSB-first, 22ms per bit:
/// 1900 Hz for a 1 bit, 2100 Hz for a 0 bit.
pub fn fskid_segments(payload: &[u8]) -> impl Iterator<Item = Segment> + '_ {
    payload.iter().flat_map(|&byte| {
        (0..6).map(move |bit| {
            let one = (byte >> bit) & 1 == 1;
            Segment::tone(if one { tones::VIS_START } else { tones::FSKID_BIT0 }, 22.0)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_matches_known_good_payload() {
        let mut payload = Vec::new();
        add_fskid_text(&mut payload, "A");
        assert_eq!(payload, vec![0x20, 0x2A, 0x21, 0x01]);
    }

    #[test]
    fn lsb_of_0x21_is_one_and_yields_1900hz() {
        let mut payload = Vec::new();
        add_fskid_text(&mut payload, "A");
        let segs: Vec<Segment> = fskid_segments(&payload).collect();
        // byte 0x21 is the third framed byte: bits for the first three
        // bytes occupy segments [12..18), [18..24).
        let third_byte_first_bit = &segs[12];
        assert_eq!(third_byte_first_bit.freq_hz, Some(1900.0));
        assert_eq!(third_byte_first_bit.duration_ms, 22.0);
    }

    #[test]
    fn multiple_calls_each_keep_their_own_leader() {
        let mut payload = Vec::new();
        add_fskid_text(&mut payload, "A");
        add_fskid_text(&mut payload, "B");
        assert_eq!(payload, vec![0x20, 0x2A, 0x21, 0x01, 0x20, 0x2A, 0x22, 0x01]);
    }

    #[test]
    fn every_fskid_tone_is_in_contract_range() {
        let mut payload = Vec::new();
        add_fskid_text(&mut payload, "de425");
        for seg in fskid_segments(&payload) {
            let f = seg.freq_hz.unwrap();
            assert!((1100.0..=2300.0).contains(&f));
        }
    }
}
