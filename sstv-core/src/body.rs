//! Per-mode line body producers.
//!
//! Dispatches on `Family`: the scan-line families (grayscale, Martin,
//! Scottie, Robot 36) each walk `0..height` one source line at a time;
//! the two-line PD family walks paired source rows.

use crate::image::PixelField;
use crate::modes::{Channel, Family, ModeDescriptor};
use crate::segment::{tones, Segment};

pub fn body_segments<'a>(
    descriptor: &'a ModeDescriptor,
    image: &'a PixelField,
) -> Box<dyn Iterator<Item = Segment> + 'a> {
    match descriptor.family {
        Family::Grayscale { scan_ms } => Box::new(grayscale_body(descriptor, image, scan_ms)),
        Family::MartinLike { scan_ms, gap_ms, order } => {
            Box::new(martin_body(descriptor, image, scan_ms, gap_ms, order))
        }
        Family::ScottieLike {
            scan_ms,
            gap_ms,
            sync_before_red_ms,
            order,
        } => Box::new(scottie_body(image, scan_ms, gap_ms, sync_before_red_ms, order)),
        Family::Robot36 {
            y_scan_ms,
            c_scan_ms,
            gap_ms,
            porch_ms,
            sync_porch_ms,
        } => Box::new(robot36_body(
            descriptor,
            image,
            y_scan_ms,
            c_scan_ms,
            gap_ms,
            porch_ms,
            sync_porch_ms,
        )),
        Family::Pd { porch_ms, pixel_ms } => Box::new(pd_body(descriptor, image, porch_ms, pixel_ms)),
    }
}

fn line_sync(descriptor: &ModeDescriptor) -> Option<Segment> {
    (descriptor.sync_ms > 0.0).then(|| Segment::tone(tones::SYNC, descriptor.sync_ms))
}

fn grayscale_body<'a>(
    descriptor: &'a ModeDescriptor,
    image: &'a PixelField,
    scan_ms: f64,
) -> impl Iterator<Item = Segment> + 'a {
    let luma = image.as_luma();
    let width = descriptor.width;
    let pixel_ms = scan_ms / width as f64;
    (0..descriptor.height).flat_map(move |y| {
        line_sync(descriptor)
            .into_iter()
            .chain((0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(luma.luma_u8(x, y)), pixel_ms)))
    })
}

fn martin_body<'a>(
    descriptor: &'a ModeDescriptor,
    image: &'a PixelField,
    scan_ms: f64,
    gap_ms: f64,
    order: [Channel; 3],
) -> impl Iterator<Item = Segment> + 'a {
    let rgb = image.as_rgb();
    let width = descriptor.width;
    let pixel_ms = scan_ms / width as f64;
    (0..descriptor.height).flat_map(move |y| {
        let gap = move || Segment::tone(tones::BLACK, gap_ms);
        let channel_scan = move |channel: Channel| {
            std::iter::once(gap()).chain(
                (0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(rgb.channel_u8(x, y, channel)), pixel_ms)),
            )
        };
        line_sync(descriptor)
            .into_iter()
            .chain(order.into_iter().flat_map(channel_scan))
            .chain(std::iter::once(gap()))
    })
}

fn scottie_body(
    image: &PixelField,
    scan_ms: f64,
    gap_ms: f64,
    sync_before_red_ms: f64,
    order: [Channel; 3],
) -> impl Iterator<Item = Segment> + '_ {
    let rgb = image.as_rgb();
    let width = rgb.width();
    let pixel_ms = scan_ms / width as f64;
    (0..rgb.height()).flat_map(move |y| {
        let channel_scan =
            move |channel: Channel| (0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(rgb.channel_u8(x, y, channel)), pixel_ms));
        let gap = move || Segment::tone(tones::BLACK, gap_ms);

        std::iter::once(Segment::tone(tones::SYNC, sync_before_red_ms))
            .chain(channel_scan(order[0]))
            .chain(std::iter::once(gap()))
            .chain(channel_scan(order[1]))
            .chain(std::iter::once(gap()))
            .chain(channel_scan(order[2]))
    })
}

fn robot36_body<'a>(
    descriptor: &'a ModeDescriptor,
    image: &'a PixelField,
    y_scan_ms: f64,
    c_scan_ms: f64,
    gap_ms: f64,
    porch_ms: f64,
    sync_porch_ms: f64,
) -> impl Iterator<Item = Segment> + 'a {
    let rgb = image.as_rgb();
    let width = descriptor.width;
    let y_pixel_ms = y_scan_ms / width as f64;
    let c_pixel_ms = c_scan_ms / width as f64;
    (0..descriptor.height).flat_map(move |y| {
        let transmits_cr = y % 2 == 0;
        // Separator tone is the level of the chroma that follows: white
        // before Cb, black before Cr.
        let separator_freq = if transmits_cr { tones::BLACK } else { tones::WHITE };

        let y_scan = (0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(rgb.ycbcr_u8(x, y).0), y_pixel_ms));
        let chroma_scan = (0..width).map(move |x| {
            let (_, cb, cr) = rgb.ycbcr_u8(x, y);
            let value = if transmits_cr { cr } else { cb };
            Segment::tone(crate::segment::byte_to_freq(value), c_pixel_ms)
        });

        std::iter::once(Segment::tone(tones::SYNC, 9.0))
            .chain(std::iter::once(Segment::tone(tones::BLACK, sync_porch_ms)))
        .chain(y_scan)
        .chain(std::iter::once(Segment::tone(separator_freq, gap_ms)))
        .chain(std::iter::once(Segment::tone(tones::VIS_START, porch_ms)))
        .chain(chroma_scan)
    })
}

fn pd_body<'a>(
    descriptor: &'a ModeDescriptor,
    image: &'a PixelField,
    porch_ms: f64,
    pixel_ms: f64,
) -> impl Iterator<Item = Segment> + 'a {
    let rgb = image.as_rgb();
    let width = descriptor.width;
    let height = descriptor.height;
    let sync_ms = descriptor.sync_ms;
    let paired_rows = (0..height).step_by(2).filter(move |&y| y + 1 < height);

    paired_rows.flat_map(move |y0| {
        let y1 = y0 + 1;
        let y0_scan = (0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(rgb.ycbcr_u8(x, y0).0), pixel_ms));
        let y1_scan = (0..width).map(move |x| Segment::tone(crate::segment::byte_to_freq(rgb.ycbcr_u8(x, y1).0), pixel_ms));
        let cr_scan = (0..width).map(move |x| {
            let (cb, cr) = rgb.ycbcr_avg_u8(x, y0, y1);
            let _ = cb;
            Segment::tone(crate::segment::byte_to_freq(cr), pixel_ms)
        });
        let cb_scan = (0..width).map(move |x| {
            let (cb, cr) = rgb.ycbcr_avg_u8(x, y0, y1);
            let _ = cr;
            Segment::tone(crate::segment::byte_to_freq(cb), pixel_ms)
        });

        std::iter::once(Segment::tone(tones::SYNC, sync_ms))
            .chain(std::iter::once(Segment::tone(tones::BLACK, porch_ms)))
            .chain(y0_scan)
            .chain(cr_scan)
            .chain(cb_scan)
            .chain(y1_scan)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{LumaImage, RgbImage};
    use crate::modes::Mode;

    fn solid_luma(width: usize, height: usize, value: f64) -> PixelField {
        PixelField::Luma(LumaImage::new(width, height, vec![value; width * height]))
    }

    fn solid_rgb(width: usize, height: usize, rgb: (f64, f64, f64)) -> PixelField {
        PixelField::Rgb(RgbImage::new(
            width,
            height,
            vec![rgb.0; width * height],
            vec![rgb.1; width * height],
            vec![rgb.2; width * height],
        ))
    }

    #[test]
    fn robot8bw_solid_black_structural_law() {
        let descriptor = Mode::Robot8Bw.descriptor();
        let image = solid_luma(160, 120, 0.0);
        let segs: Vec<Segment> = body_segments(&descriptor, &image).collect();

        let syncs = segs.iter().filter(|s| s.freq_hz == Some(1200.0) && s.duration_ms == 7.0).count();
        assert_eq!(syncs, 120);
        let scans = segs.iter().filter(|s| s.freq_hz == Some(1500.0)).count();
        assert_eq!(scans, 120 * 160);
    }

    #[test]
    fn martin_m1_solid_white_structural_law() {
        let descriptor = Mode::MartinM1.descriptor();
        let image = solid_rgb(320, 256, (1.0, 1.0, 1.0));
        let segs: Vec<Segment> = body_segments(&descriptor, &image).collect();

        // One line: sync + 4 gaps + 3*320 pixel segments.
        let per_line = 1 + 4 + 3 * 320;
        assert_eq!(segs.len(), per_line * 256);

        let pixel_segs = segs.iter().filter(|s| s.freq_hz == Some(2300.0)).count();
        assert_eq!(pixel_segs, 3 * 320 * 256);

        let gaps = segs.iter().filter(|s| s.freq_hz == Some(1500.0) && s.duration_ms == 0.572).count();
        assert_eq!(gaps, 4 * 256);
    }

    #[test]
    fn scottie_s1_first_per_line_segment_is_sync_not_gap() {
        let descriptor = Mode::ScottieS1.descriptor();
        let image = solid_rgb(320, 256, (0.5, 0.5, 0.5));
        let segs: Vec<Segment> = body_segments(&descriptor, &image).collect();
        assert_eq!(segs[0], Segment::tone(1200.0, 9.0));

        let per_line = 1 + 3 * 320 + 2;
        assert_eq!(segs.len(), per_line * 256);
    }

    #[test]
    fn robot36_separator_tone_alternates_with_line_parity() {
        let descriptor = Mode::Robot36.descriptor();
        let image = solid_rgb(320, 240, (1.0, 0.0, 0.0));
        let segs: Vec<Segment> = body_segments(&descriptor, &image).collect();

        // Per line: sync, sync-porch, 320 Y, separator, porch, 320 chroma = 324 segments.
        let per_line = 324;
        let line0_separator = segs[per_line * 0 + 2 + 320];
        let line1_separator = segs[per_line * 1 + 2 + 320];
        assert_eq!(line0_separator.freq_hz, Some(1500.0)); // even line transmits Cr
        assert_eq!(line1_separator.freq_hz, Some(2300.0)); // odd line transmits Cb
    }

    #[test]
    fn pd120_transmitted_line_count_and_block_shape() {
        let descriptor = Mode::Pd120.descriptor();
        let image = solid_rgb(640, 496, (0.2, 0.3, 0.4));
        let segs: Vec<Segment> = body_segments(&descriptor, &image).collect();

        let per_line = 2 + 4 * 640;
        assert_eq!(segs.len() % per_line, 0);
        assert_eq!(segs.len() / per_line, 248);
    }
}
